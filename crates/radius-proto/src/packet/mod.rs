mod code;
mod codec;
mod hook;
mod identifier;
#[allow(clippy::module_inception)]
mod packet;

pub use code::Code;
pub use codec::Codec;
pub use hook::{AttributeHook, UserPasswordHook};
pub use identifier::IdentifierAllocator;
pub use packet::{copy_proxy_state, Packet, PacketError};
