pub mod codec;
pub mod wav;

pub use codec::decode_to_mono;
pub use wav::{read_wav, write_wav};
