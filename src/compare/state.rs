use serde::Serialize;

use crate::model::ImageRef;

use super::CompareError;

/// Insertion-ordered set of image references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageSet {
    items: Vec<ImageRef>,
}

impl ImageSet {
    pub fn contains(&self, image: &ImageRef) -> bool {
        self.items.contains(image)
    }

    /// Returns false when the image was already present.
    pub fn insert(&mut self, image: ImageRef) -> bool {
        if self.contains(&image) {
            return false;
        }
        self.items.push(image);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ImageRef> {
        self.items.clone()
    }
}

/// One tournament position: the current best and the queue challenging it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonState {
    pub current_best: ImageRef,
    pub candidates: Vec<ImageRef>,
    pub cursor: usize,
    pub saved: ImageSet,
    pub rejected: ImageSet,
}

impl ComparisonState {
    pub(super) fn from_batch(batch: &[ImageRef]) -> Result<Self, CompareError> {
        let [first, rest @ ..] = batch else {
            return Err(CompareError::InvalidBatch { len: 0 });
        };
        if rest.is_empty() {
            return Err(CompareError::InvalidBatch { len: batch.len() });
        }
        Ok(Self {
            current_best: first.clone(),
            candidates: rest.to_vec(),
            cursor: 0,
            saved: ImageSet::default(),
            rejected: ImageSet::default(),
        })
    }

    /// The candidate under review, if the cursor points at one.
    pub fn current_candidate(&self) -> Option<&ImageRef> {
        self.candidates.get(self.cursor)
    }

    /// No candidates left: `current_best` is the winner.
    pub fn is_resolved(&self) -> bool {
        self.candidates.is_empty()
    }

    fn require_candidate(&self) -> Result<(), CompareError> {
        if self.cursor >= self.candidates.len() {
            return Err(CompareError::NoActiveCandidate);
        }
        Ok(())
    }

    pub(super) fn next_candidate(&mut self) -> Result<(), CompareError> {
        self.require_candidate()?;
        self.cursor = (self.cursor + 1).min(self.candidates.len());
        Ok(())
    }

    pub(super) fn previous_candidate(&mut self) -> Result<(), CompareError> {
        self.require_candidate()?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(())
    }

    pub(super) fn select_current_best(&mut self) -> Result<(), CompareError> {
        self.require_candidate()?;
        let challenger = self.candidates.remove(self.cursor);
        let displaced = std::mem::replace(&mut self.current_best, challenger);
        self.candidates.insert(self.cursor, displaced);
        Ok(())
    }

    pub(super) fn save_image(&mut self) -> Result<(), CompareError> {
        if self.rejected.contains(&self.current_best) {
            return Err(CompareError::AlreadyRejected(self.current_best.clone()));
        }
        self.saved.insert(self.current_best.clone());
        Ok(())
    }

    pub(super) fn reject_image(&mut self) -> Result<(), CompareError> {
        self.require_candidate()?;
        let candidate = &self.candidates[self.cursor];
        if self.saved.contains(candidate) {
            return Err(CompareError::AlreadySaved(candidate.clone()));
        }
        let candidate = self.candidates.remove(self.cursor);
        self.rejected.insert(candidate);
        Ok(())
    }
}
