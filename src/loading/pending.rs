use bevy::asset::LoadState;
use bevy::prelude::*;

use super::queue::{AssetRole, SceneMutation, SceneMutationQueue};

/// Reduced view of an asset's load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Pending,
    Ready,
    Failed(String),
}

pub fn classify(state: Option<&LoadState>) -> LoadOutcome {
    match state {
        Some(LoadState::Loaded) => LoadOutcome::Ready,
        Some(LoadState::Failed(err)) => LoadOutcome::Failed(err.to_string()),
        // Unknown handles never resolve; treat as failure instead of waiting forever.
        None => LoadOutcome::Failed("asset id not tracked by the asset server".into()),
        Some(_) => LoadOutcome::Pending,
    }
}

#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub role: AssetRole,
    pub path: String,
    pub handle: UntypedHandle,
}

/// Outstanding load requests, polled once per frame.
#[derive(Resource, Default, Debug)]
pub struct PendingLoads {
    requests: Vec<PendingLoad>,
}

impl PendingLoads {
    /// Start loading `path` and remember what it is for.
    pub fn request<A: Asset>(&mut self, asset_server: &AssetServer, role: AssetRole, path: impl Into<String>) -> Handle<A> {
        let path = path.into();
        let handle: Handle<A> = asset_server.load(path.clone());
        info!(target: "assets", "requested {path} for {role:?}");
        self.requests.push(PendingLoad {
            role,
            path,
            handle: handle.clone().untyped(),
        });
        handle
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Move every resolved request into `queue` as a mutation; keep the rest.
    pub fn resolve_with<F>(&mut self, mut state_of: F, queue: &mut SceneMutationQueue)
    where
        F: FnMut(&UntypedHandle) -> LoadOutcome,
    {
        self.requests.retain(|req| match state_of(&req.handle) {
            LoadOutcome::Pending => true,
            LoadOutcome::Ready => {
                queue.push(SceneMutation::Ready {
                    role: req.role,
                    handle: req.handle.clone(),
                });
                false
            }
            LoadOutcome::Failed(reason) => {
                queue.push(SceneMutation::Failed {
                    role: req.role,
                    path: req.path.clone(),
                    reason,
                });
                false
            }
        });
    }
}

pub fn poll_pending_loads(
    asset_server: Option<Res<AssetServer>>,
    mut pending: ResMut<PendingLoads>,
    mut queue: ResMut<SceneMutationQueue>,
) {
    let Some(asset_server) = asset_server else {
        return;
    };
    if pending.is_empty() {
        return;
    }
    pending.resolve_with(
        |handle| classify(asset_server.get_load_state(handle.id()).as_ref()),
        &mut queue,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_states() {
        assert_eq!(classify(Some(&LoadState::Loaded)), LoadOutcome::Ready);
        assert_eq!(classify(Some(&LoadState::Loading)), LoadOutcome::Pending);
        assert_eq!(classify(Some(&LoadState::NotLoaded)), LoadOutcome::Pending);
        assert!(matches!(classify(None), LoadOutcome::Failed(_)));
    }

    #[test]
    fn resolve_moves_finished_requests_into_queue() {
        let mut pending = PendingLoads::default();
        for (i, path) in ["a.png", "b.png", "c.png"].iter().enumerate() {
            pending.requests.push(PendingLoad {
                role: AssetRole::Sticker(i),
                path: path.to_string(),
                handle: Handle::<Image>::default().untyped(),
            });
        }
        let mut queue = SceneMutationQueue::default();
        let mut calls = 0;
        pending.resolve_with(
            |_| {
                calls += 1;
                match calls {
                    1 => LoadOutcome::Ready,
                    2 => LoadOutcome::Pending,
                    _ => LoadOutcome::Failed("decode".into()),
                }
            },
            &mut queue,
        );
        assert_eq!(pending.len(), 1);
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(!drained[0].is_failure());
        assert!(drained[1].is_failure());
    }
}
