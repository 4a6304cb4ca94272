pub mod enums;
pub mod name;
pub mod packet;
pub mod resource;

pub use enums::{DNSResourceClass, DNSResourceType};
pub use name::Name;
pub use packet::DNSPacket;
pub use resource::{DNSResource, RRset};
