mod device_config;
mod label;
mod pin;
mod signature;

pub use device_config::{DeviceConfig, DeviceConfigError};
pub use label::{Label, LabelError};
pub use pin::{Pin, PinError};
pub use signature::{Signature, SignatureError};
