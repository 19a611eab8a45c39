use dealerhub_audit::Actor;
use dealerhub_auth::Identity;

/// Client address for a request, inserted for every route.
///
/// `X-Forwarded-For` (first hop) wins over the socket peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Principal context for a request (authenticated identity + audit name).
///
/// Present only behind the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
    display_name: String,
}

impl PrincipalContext {
    pub fn new(identity: Identity, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Name used as `whoUserName` on audit entries.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn actor(&self, ip: &ClientIp) -> Actor {
        Actor::new(self.identity.subject(), self.display_name.clone(), ip.as_str())
    }
}
