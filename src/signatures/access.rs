use std::collections::{HashMap, HashSet};

use super::types::Actor;

/// Authorization decisions made outside the engine.
pub trait AccessControl: Send + Sync {
    fn is_admin(&self, actor: &Actor) -> bool;

    /// Source names whose records the actor may see. `None` means unrestricted.
    fn sources_visible_to(&self, actor: &Actor) -> Option<HashSet<String>>;
}

/// Access rules loaded from configuration: a set of admin user IDs and an
/// optional per-user source allow-list.
#[derive(Debug, Clone, Default)]
pub struct StaticAccess {
    admins: HashSet<u64>,
    source_acl: HashMap<u64, HashSet<String>>,
}

impl StaticAccess {
    pub fn new(admins: HashSet<u64>) -> Self {
        Self {
            admins,
            source_acl: HashMap::new(),
        }
    }

    pub fn with_source_acl(mut self, acl: HashMap<u64, HashSet<String>>) -> Self {
        self.source_acl = acl;
        self
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }
}

impl AccessControl for StaticAccess {
    fn is_admin(&self, actor: &Actor) -> bool {
        self.admins.contains(&actor.id)
    }

    /// Admins and everyone on an unconfigured ACL see all sources; once an
    /// ACL is configured, unlisted users see none.
    fn sources_visible_to(&self, actor: &Actor) -> Option<HashSet<String>> {
        if self.source_acl.is_empty() || self.is_admin(actor) {
            return None;
        }
        Some(self.source_acl.get(&actor.id).cloned().unwrap_or_default())
    }
}

/// Parse `user_id=SourceA|SourceB;user_id=SourceC`. Malformed pairs are skipped.
pub fn parse_source_acl(raw: &str) -> HashMap<u64, HashSet<String>> {
    let mut acl: HashMap<u64, HashSet<String>> = HashMap::new();
    for pair in raw.split(';') {
        let Some((user, sources)) = pair.split_once('=') else {
            continue;
        };
        let Ok(user) = user.trim().parse::<u64>() else {
            continue;
        };
        acl.entry(user).or_default().extend(
            sources
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    acl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_acl() {
        let acl = parse_source_acl("1=OSINT|Partner; 2 = OSINT ;bad;x=Y;");
        assert_eq!(acl.len(), 2);
        assert!(acl[&1].contains("Partner"));
        assert_eq!(acl[&2].len(), 1);
    }

    #[test]
    fn test_visibility_rules() {
        let open = StaticAccess::new(HashSet::from([7]));
        assert!(open.sources_visible_to(&Actor::new(1, "u")).is_none());

        let acl = StaticAccess::new(HashSet::from([7])).with_source_acl(parse_source_acl("1=OSINT"));
        assert!(acl.is_admin(&Actor::new(7, "admin")));
        assert!(acl.sources_visible_to(&Actor::new(7, "admin")).is_none());
        assert_eq!(
            acl.sources_visible_to(&Actor::new(1, "u")),
            Some(HashSet::from(["OSINT".to_string()]))
        );
        assert_eq!(acl.sources_visible_to(&Actor::new(2, "v")), Some(HashSet::new()));
    }
}
