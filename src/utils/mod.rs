mod encoding;
pub use encoding::*;

mod polling;
pub use polling::*;

mod secp256k;
pub use secp256k::*;
