pub mod counter;
pub mod device;
pub mod result;

pub use counter::{Direction, InterfaceCounter, RankedEntry};
pub use device::DeviceId;
pub use result::{DeviceResult, DeviceStatus, Rankings};
