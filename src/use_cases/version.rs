//! Device version query

use tracing::info;

use crate::error::HsmResult;
use crate::logic::{check, Operation};
use crate::ports::SessionProvider;
use crate::session::SessionManager;

/// Query the device library version; opens no session
pub fn get_version<D: SessionProvider>(sessions: &SessionManager<D>) -> HsmResult<u32> {
    let version = check(
        Operation::GetVersion,
        sessions.timed(Operation::GetVersion, || sessions.device().version()),
    )?;
    info!("Device version {:#X}", version);
    Ok(version)
}
