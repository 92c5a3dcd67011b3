use std::collections::{HashMap, VecDeque};

use kerpic::library::Library;
use kerpic::model::ImageInfo;
use tokio::sync::RwLock;

/// Batches remembered at once; the oldest is forgotten past this.
const MAX_BATCHES: usize = 1024;

pub(super) struct AppState {
    pub(super) library: Library,
    pub(super) batches: RwLock<Batches>,
}

impl AppState {
    pub(super) fn new(library: Library) -> Self {
        Self {
            library,
            batches: RwLock::new(Batches::with_limit(MAX_BATCHES)),
        }
    }
}

/// Recent batches, kept in memory only. Ids keep counting after eviction.
pub(super) struct Batches {
    next: u64,
    limit: usize,
    order: VecDeque<String>,
    by_id: HashMap<String, Vec<ImageInfo>>,
}

impl Batches {
    pub(super) fn with_limit(limit: usize) -> Self {
        Self {
            next: 0,
            limit: limit.max(1),
            order: VecDeque::new(),
            by_id: HashMap::new(),
        }
    }

    pub(super) fn insert(&mut self, images: Vec<ImageInfo>) -> String {
        let id = format!("batch_{}", self.next);
        self.next += 1;
        while self.order.len() >= self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.by_id.remove(&oldest);
                tracing::debug!(batch = %oldest, "forgetting old batch");
            }
        }
        self.order.push_back(id.clone());
        self.by_id.insert(id.clone(), images);
        id
    }

    pub(super) fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub(super) fn len(&self) -> usize {
        self.by_id.len()
    }
}
