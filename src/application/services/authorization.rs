use std::collections::HashSet;

/// Authorization seam for the admin surface. The pilot ships a static
/// allow-list, but call sites only see this trait, so a real policy store
/// can replace it without touching them.
pub trait AdminPolicy: Send + Sync {
    fn is_authorized(&self, user_id: &str) -> bool;
}

pub struct AllowListPolicy {
    admins: HashSet<String>,
}

impl AllowListPolicy {
    /// Reads `ADMIN_USER_IDS` as a comma-separated list. Unset or empty
    /// means nobody is an administrator.
    pub fn from_env() -> Self {
        let admins = std::env::var("ADMIN_USER_IDS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .map(String::from)
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();

        Self { admins }
    }

    pub fn new(admins: impl IntoIterator<Item = String>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

impl AdminPolicy for AllowListPolicy {
    fn is_authorized(&self, user_id: &str) -> bool {
        self.admins.contains(user_id)
    }
}
