use std::collections::BTreeMap;
use std::fmt;

/// Errors from render backends.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no rendering capability: {0}")]
    Unavailable(String),
    #[error("{kind} #{raw} is not live (never allocated or already disposed)")]
    UnknownResource { kind: ResourceKind, raw: u64 },
    #[error("surface {0:?} is not the active surface")]
    WrongSurface(SurfaceHandle),
    #[error("frame skipped: {0}")]
    FrameSkipped(String),
    #[error("backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Surface,
    Geometry,
    Material,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Surface,
        ResourceKind::Geometry,
        ResourceKind::Material,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Surface => "surface",
            ResourceKind::Geometry => "geometry",
            ResourceKind::Material => "material",
        };
        f.write_str(name)
    }
}

/// Rendering surface (the context plus its on-screen buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Bookkeeping of every resource a backend has handed out.
///
/// Ids are never reused, so a handle from a previous mount can not alias a
/// resource of the current one.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    next_id: u64,
    live: BTreeMap<u64, ResourceKind>,
    allocated: BTreeMap<ResourceKind, u64>,
    disposed: BTreeMap<ResourceKind, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new allocation and return its raw id.
    pub fn allocate(&mut self, kind: ResourceKind) -> u64 {
        self.next_id += 1;
        let raw = self.next_id;
        self.live.insert(raw, kind);
        *self.allocated.entry(kind).or_default() += 1;
        raw
    }

    /// Record a disposal. Fails for unknown ids, kind mismatches and double disposal.
    pub fn release(&mut self, kind: ResourceKind, raw: u64) -> Result<(), RenderError> {
        match self.live.get(&raw) {
            Some(k) if *k == kind => {
                self.live.remove(&raw);
                *self.disposed.entry(kind).or_default() += 1;
                Ok(())
            }
            _ => Err(RenderError::UnknownResource { kind, raw }),
        }
    }

    pub fn is_live(&self, kind: ResourceKind, raw: u64) -> bool {
        self.live.get(&raw) == Some(&kind)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_of(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    pub fn allocated(&self, kind: ResourceKind) -> u64 {
        self.allocated.get(&kind).copied().unwrap_or(0)
    }

    pub fn disposed(&self, kind: ResourceKind) -> u64 {
        self.disposed.get(&kind).copied().unwrap_or(0)
    }

    /// Every allocation of every kind has exactly one matching disposal.
    pub fn is_balanced(&self) -> bool {
        self.live.is_empty()
            && ResourceKind::ALL
                .iter()
                .all(|k| self.allocated(*k) == self.disposed(*k))
    }

    /// One line per kind: `kind allocated/disposed (live)`.
    pub fn summary(&self) -> String {
        ResourceKind::ALL
            .iter()
            .map(|k| {
                format!(
                    "{k}: allocated={} disposed={} live={}",
                    self.allocated(*k),
                    self.disposed(*k),
                    self.live_of(*k)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_release_balance() {
        let mut ledger = ResourceLedger::new();
        let s = ledger.allocate(ResourceKind::Surface);
        let g = ledger.allocate(ResourceKind::Geometry);
        assert_ne!(s, g);
        assert_eq!(ledger.live_count(), 2);
        assert!(!ledger.is_balanced());

        ledger.release(ResourceKind::Geometry, g).unwrap();
        ledger.release(ResourceKind::Surface, s).unwrap();
        assert!(ledger.is_balanced());
        assert_eq!(ledger.allocated(ResourceKind::Geometry), 1);
        assert_eq!(ledger.disposed(ResourceKind::Geometry), 1);
    }

    #[test]
    fn double_dispose_is_rejected() {
        let mut ledger = ResourceLedger::new();
        let m = ledger.allocate(ResourceKind::Material);
        ledger.release(ResourceKind::Material, m).unwrap();
        let err = ledger.release(ResourceKind::Material, m).unwrap_err();
        assert!(matches!(err, RenderError::UnknownResource { raw, .. } if raw == m));
        assert_eq!(ledger.disposed(ResourceKind::Material), 1);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut ledger = ResourceLedger::new();
        let g = ledger.allocate(ResourceKind::Geometry);
        assert!(ledger.release(ResourceKind::Material, g).is_err());
        assert!(ledger.is_live(ResourceKind::Geometry, g));
    }

    #[test]
    fn summary_lists_every_kind() {
        let mut ledger = ResourceLedger::new();
        ledger.allocate(ResourceKind::Geometry);
        let text = ledger.summary();
        assert!(text.contains("surface: allocated=0"));
        assert!(text.contains("geometry: allocated=1 disposed=0 live=1"));
        assert!(text.contains("material:"));
    }
}
