use bevy::prelude::*;
use std::collections::VecDeque;

/// What a requested asset is for; scenes match on this when applying completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    TitleFont,
    Sticker(usize),
    Model,
}

/// Completion of an asynchronous load, applied by the frame loop.
#[derive(Debug, Clone)]
pub enum SceneMutation {
    Ready {
        role: AssetRole,
        handle: UntypedHandle,
    },
    Failed {
        role: AssetRole,
        path: String,
        reason: String,
    },
}

impl SceneMutation {
    pub fn role(&self) -> AssetRole {
        match self {
            Self::Ready { role, .. } | Self::Failed { role, .. } => *role,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// FIFO of scene mutations. Only systems running on the main schedule touch it.
#[derive(Resource, Default, Debug)]
pub struct SceneMutationQueue {
    pending: VecDeque<SceneMutation>,
}

impl SceneMutationQueue {
    pub fn push(&mut self, m: SceneMutation) {
        self.pending.push_back(m);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every queued mutation in arrival order.
    pub fn drain(&mut self) -> Vec<SceneMutation> {
        self.pending.drain(..).collect()
    }

    /// Remove and return failures only, leaving the rest queued in order.
    pub fn take_failures(&mut self) -> Vec<SceneMutation> {
        let mut failures = Vec::new();
        let mut keep = VecDeque::with_capacity(self.pending.len());
        while let Some(m) = self.pending.pop_front() {
            if m.is_failure() {
                failures.push(m);
            } else {
                keep.push_back(m);
            }
        }
        self.pending = keep;
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(i: usize) -> SceneMutation {
        SceneMutation::Failed {
            role: AssetRole::Sticker(i),
            path: format!("stickers/{i}.png"),
            reason: "missing".into(),
        }
    }

    #[test]
    fn take_failures_preserves_order_of_rest() {
        let mut q = SceneMutationQueue::default();
        q.push(failed(0));
        q.push(SceneMutation::Ready { role: AssetRole::Sticker(1), handle: UntypedHandle::from(Handle::<Image>::default()) });
        q.push(failed(2));
        q.push(SceneMutation::Ready { role: AssetRole::Model, handle: UntypedHandle::from(Handle::<Image>::default()) });
        let f = q.take_failures();
        assert_eq!(f.iter().map(|m| m.role()).collect::<Vec<_>>(), vec![AssetRole::Sticker(0), AssetRole::Sticker(2)]);
        let rest = q.drain();
        assert_eq!(rest.iter().map(|m| m.role()).collect::<Vec<_>>(), vec![AssetRole::Sticker(1), AssetRole::Model]);
        assert!(q.is_empty());
    }
}
