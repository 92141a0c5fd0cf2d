use crate::gemini::request::Request;
use crate::gemini::response::Status;

/// Every path below this prefix is reserved for administrators.
pub const ADMIN_PREFIX: &str = "/_admin";

/// Required prefix of an administrator certificate's common name.
pub const ADMIN_NAME_PREFIX: &str = "admin@";

pub fn is_admin_path(path: &str) -> bool {
    path.starts_with(ADMIN_PREFIX)
}

/// Checks the client certificate for administrative paths.
///
/// Other paths are always allowed. The denial status only says whether a
/// certificate was missing or not accepted.
pub fn authorize(request: &Request) -> Result<(), Status> {
    if !is_admin_path(&request.path) {
        return Ok(());
    }

    let Some(client) = &request.client else {
        return Err(Status::CertificateRequired);
    };

    match client.common_name.as_deref() {
        Some(name) if name.starts_with(ADMIN_NAME_PREFIX) => Ok(()),
        _ => Err(Status::CertificateNotAuthorized),
    }
}
