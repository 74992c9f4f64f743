//! Version-gated storage permissions for the file browser.
//!
//! The required permission set is a pure function of the storage API
//! generation and the kind of access requested, expressed as one capability
//! table instead of nested version checks. The gate itself is a small state
//! machine driving the request/grant/deny flow and remembering the action
//! that triggered it, so an out-of-band grant can resume it.

/// Individual grants the platform can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadImages,
    ReadVideo,
    ReadAudio,
    ReadStorage,
    WriteStorage,
    ManageStorage,
}

impl Permission {
    pub fn label(self) -> &'static str {
        match self {
            Permission::ReadImages => "Read images",
            Permission::ReadVideo => "Read video",
            Permission::ReadAudio => "Read audio",
            Permission::ReadStorage => "Read storage",
            Permission::WriteStorage => "Write storage",
            Permission::ManageStorage => "Manage all files",
        }
    }
}

/// What the screen is about to do with storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Read-only browsing of a directory.
    Browse,
    /// Writing an exported file.
    Export,
}

struct Capability {
    min_api: u32,
    max_api: u32,
    kind: AccessKind,
    set: &'static [Permission],
}

// Generations mirror the storage-access history the app grew up with:
// legacy storage (<29), scoped storage (29..=32), granular media grants and
// the all-files grant (33+ / 30+).
const CAPABILITIES: &[Capability] = &[
    Capability {
        min_api: 0,
        max_api: 28,
        kind: AccessKind::Browse,
        set: &[Permission::ReadStorage, Permission::WriteStorage],
    },
    Capability {
        min_api: 29,
        max_api: 32,
        kind: AccessKind::Browse,
        set: &[Permission::ReadStorage],
    },
    Capability {
        min_api: 33,
        max_api: u32::MAX,
        kind: AccessKind::Browse,
        set: &[
            Permission::ReadImages,
            Permission::ReadVideo,
            Permission::ReadAudio,
        ],
    },
    Capability {
        min_api: 0,
        max_api: 28,
        kind: AccessKind::Export,
        set: &[Permission::WriteStorage],
    },
    Capability {
        min_api: 29,
        max_api: 29,
        kind: AccessKind::Export,
        set: &[],
    },
    Capability {
        min_api: 30,
        max_api: u32::MAX,
        kind: AccessKind::Export,
        set: &[Permission::ManageStorage],
    },
];

/// Permissions required for `kind` at storage API generation `api`.
pub fn required_permissions(api: u32, kind: AccessKind) -> &'static [Permission] {
    CAPABILITIES
        .iter()
        .find(|c| c.kind == kind && (c.min_api..=c.max_api).contains(&api))
        .map(|c| c.set)
        .unwrap_or(&[])
}

/// Answers whether a grant is currently held. The app backs this with real
/// accessibility checks against the target directory.
pub trait PermissionProbe {
    fn is_granted(&self, permission: Permission) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unrequested,
    Requested,
    Granted,
    Denied,
}

/// Decision returned when a screen wants to act.
#[derive(Debug, PartialEq)]
pub enum GateDecision<A> {
    /// Every required permission is held; run the action now.
    Proceed(A),
    /// These permissions are missing; prompt the user and report back via
    /// [`PermissionGate::on_request_result`].
    Request(Vec<Permission>),
}

pub struct PermissionGate<A> {
    api: u32,
    kind: AccessKind,
    state: GateState,
    pending: Option<A>,
}

impl<A> PermissionGate<A> {
    pub fn new(api: u32, kind: AccessKind) -> Self {
        Self {
            api,
            kind,
            state: GateState::Unrequested,
            pending: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The action waiting on a grant, if any.
    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    /// Entry point for an intended action: either proceed immediately or
    /// park the action and ask for the missing permissions.
    pub fn begin(&mut self, action: A, probe: &dyn PermissionProbe) -> GateDecision<A> {
        let missing: Vec<Permission> = required_permissions(self.api, self.kind)
            .iter()
            .copied()
            .filter(|p| !probe.is_granted(*p))
            .collect();

        if missing.is_empty() {
            self.state = GateState::Granted;
            GateDecision::Proceed(action)
        } else {
            tracing::debug!(?missing, kind = ?self.kind, "storage permissions missing");
            self.state = GateState::Requested;
            self.pending = Some(action);
            GateDecision::Request(missing)
        }
    }

    /// Outcome of the prompt started by [`begin`](Self::begin). On a grant
    /// the parked action is handed back to run.
    pub fn on_request_result(&mut self, granted: bool) -> Option<A> {
        if granted {
            self.state = GateState::Granted;
            self.pending.take()
        } else {
            self.state = GateState::Denied;
            None
        }
    }

    /// Re-probe after the user returns from a settings round trip. If the
    /// grant appeared out of band, the original action resumes without
    /// another prompt.
    pub fn on_resume(&mut self, probe: &dyn PermissionProbe) -> Option<A> {
        if !matches!(self.state, GateState::Requested | GateState::Denied) {
            return None;
        }
        let all_held = required_permissions(self.api, self.kind)
            .iter()
            .all(|p| probe.is_granted(*p));
        if all_held {
            self.state = GateState::Granted;
            self.pending.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedProbe {
        held: HashSet<Permission>,
    }

    impl FixedProbe {
        fn none() -> Self {
            Self {
                held: HashSet::new(),
            }
        }

        fn all() -> Self {
            Self {
                held: [
                    Permission::ReadImages,
                    Permission::ReadVideo,
                    Permission::ReadAudio,
                    Permission::ReadStorage,
                    Permission::WriteStorage,
                    Permission::ManageStorage,
                ]
                .into_iter()
                .collect(),
            }
        }
    }

    impl PermissionProbe for FixedProbe {
        fn is_granted(&self, permission: Permission) -> bool {
            self.held.contains(&permission)
        }
    }

    #[test]
    fn capability_table_matches_the_generations() {
        assert_eq!(
            required_permissions(28, AccessKind::Browse),
            &[Permission::ReadStorage, Permission::WriteStorage]
        );
        assert_eq!(
            required_permissions(29, AccessKind::Browse),
            &[Permission::ReadStorage]
        );
        assert_eq!(
            required_permissions(34, AccessKind::Browse),
            &[
                Permission::ReadImages,
                Permission::ReadVideo,
                Permission::ReadAudio
            ]
        );
        assert_eq!(
            required_permissions(28, AccessKind::Export),
            &[Permission::WriteStorage]
        );
        assert!(required_permissions(29, AccessKind::Export).is_empty());
        assert_eq!(
            required_permissions(34, AccessKind::Export),
            &[Permission::ManageStorage]
        );
    }

    #[test]
    fn held_permissions_proceed_immediately() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(34, AccessKind::Browse);
        let decision = gate.begin("load", &FixedProbe::all());
        assert_eq!(decision, GateDecision::Proceed("load"));
        assert_eq!(gate.state(), GateState::Granted);
    }

    #[test]
    fn nothing_required_proceeds_too() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(29, AccessKind::Export);
        let decision = gate.begin("export", &FixedProbe::none());
        assert_eq!(decision, GateDecision::Proceed("export"));
    }

    #[test]
    fn missing_permissions_park_the_action() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(34, AccessKind::Browse);
        match gate.begin("load", &FixedProbe::none()) {
            GateDecision::Request(missing) => assert_eq!(missing.len(), 3),
            other => panic!("expected a request, got {:?}", other),
        }
        assert_eq!(gate.state(), GateState::Requested);
        assert!(gate.pending().is_some());
    }

    #[test]
    fn grant_after_request_resumes_the_action() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(34, AccessKind::Browse);
        let _ = gate.begin("load", &FixedProbe::none());
        assert_eq!(gate.on_request_result(true), Some("load"));
        assert_eq!(gate.state(), GateState::Granted);
    }

    #[test]
    fn denial_then_out_of_band_grant_resumes_on_return() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(34, AccessKind::Browse);
        let _ = gate.begin("load", &FixedProbe::none());
        assert_eq!(gate.on_request_result(false), None);
        assert_eq!(gate.state(), GateState::Denied);

        // User flipped the grant in settings and came back: the original
        // action proceeds without another prompt.
        assert_eq!(gate.on_resume(&FixedProbe::all()), Some("load"));
        assert_eq!(gate.state(), GateState::Granted);
    }

    #[test]
    fn resume_without_the_grant_stays_denied() {
        let mut gate: PermissionGate<&str> = PermissionGate::new(34, AccessKind::Browse);
        let _ = gate.begin("load", &FixedProbe::none());
        let _ = gate.on_request_result(false);
        assert_eq!(gate.on_resume(&FixedProbe::none()), None);
        assert_eq!(gate.state(), GateState::Denied);
    }
}
