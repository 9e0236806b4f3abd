//! ABI of the demo greeting contract used as a forwarding target.
use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IGreeter {
        event GreetingSent(address indexed greeter, string greeting, uint256 greetCount);

        function setGreeting(string greeting) external;
        function sayHi() external;
        function getGreeting() external view returns (string);
        function getLastGreeter() external view returns (address);
        function getGreetCount() external view returns (uint256);
        function getMessageInfo()
            external
            view
            returns (address sender, string greeting, uint256 greetCount);
        function getCurrentGreeting() external view returns (string);
        function getGreetingInfo()
            external
            view
            returns (string greeting, address lastGreeter, uint256 greetCount);
        function isTrustedForwarder(address forwarder) external view returns (bool);
    }
}

/// Greeting every freshly deployed greeter starts with.
pub const INITIAL_GREETING: &str = "Hello, World!";

/// Greeting stored by `sayHi` on behalf of `sender`.
pub fn hi_greeting(sender: alloy::primitives::Address) -> String {
    format!("Hi from 0x{}!", hex::encode(sender.as_slice()))
}
