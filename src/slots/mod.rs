//! # Photo Slot Manager
//!
//! A fixed number of ordered photo slots (three by default). Slot 0 holds the
//! primary photo shown on the product card; the others are extra gallery shots.
//!
//! ## Fill Order
//!
//! Slots fill left to right: slot `i > 0` can only be assigned while slot
//! `i - 1` is filled. Assigning an already-filled slot replaces its photo.
//!
//! ```text
//!  [ 0 primary ] [ 1 extra ] [ 2 extra ]
//!       ▲             ▲           ▲
//!   always open   needs 0     needs 1
//! ```
//!
//! ## Gaps
//!
//! [`PhotoSlotManager::remove`] does not shift later photos down, so removing
//! slot 0 while slot 1 is filled leaves a gap. [`PhotoSlotManager::to_payload`]
//! stops at the first empty slot and silently drops anything after it. The
//! seller usually refills the gap immediately; [`PhotoSlotManager::has_gap`]
//! lets a caller warn before submitting.
//!
//! ## Concurrency
//!
//! Every mutation takes `&mut self`, so two assignments against one slot set
//! cannot overlap. [`PhotoSlotManager::assign_async`] moves the decode/encode
//! work onto tokio's blocking pool and applies the result when it returns.

use log::info;

use crate::codec::{ImageCodec, RasterCodec};
use crate::config::SlotConfig;
use crate::error::{PhotoError, PhotoResult};
use crate::processing::{ImageNormalizer, NormalizedImage};
use crate::selection::RawSelection;

/// Serialized slot contents for the product-submission collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductImages {
    /// JPEG bytes of slot 0, if filled.
    pub primary: Option<Vec<u8>>,
    /// Filled slots directly following slot 0, in slot order.
    pub extras: Vec<Vec<u8>>,
}

impl ProductImages {
    pub fn len(&self) -> usize {
        usize::from(self.primary.is_some()) + self.extras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered, bounded set of normalized product photos.
#[derive(Debug)]
pub struct PhotoSlotManager<C = RasterCodec> {
    normalizer: ImageNormalizer<C>,
    slots: Vec<Option<NormalizedImage>>,
}

impl PhotoSlotManager<RasterCodec> {
    /// Empty slot set with the default capacity and normalizer.
    pub fn new() -> Self {
        Self::with_normalizer(ImageNormalizer::default())
    }
}

impl Default for PhotoSlotManager<RasterCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> PhotoSlotManager<C> {
    /// Empty slot set with the default capacity.
    pub fn with_normalizer(normalizer: ImageNormalizer<C>) -> Self {
        Self {
            normalizer,
            slots: vec![None; SlotConfig::default().max_slots],
        }
    }

    /// Empty slot set with a custom capacity.
    pub fn with_config(normalizer: ImageNormalizer<C>, config: SlotConfig) -> PhotoResult<Self> {
        config.validate()?;
        Ok(Self {
            normalizer,
            slots: vec![None; config.max_slots],
        })
    }

    pub fn normalizer(&self) -> &ImageNormalizer<C> {
        &self.normalizer
    }

    /// Normalize `selection` and store it in `slot`, replacing any previous photo.
    ///
    /// Fails with `SlotOrderViolation` before any normalization if the previous
    /// slot is empty. Normalizer errors are returned unchanged and leave every
    /// slot as it was.
    pub fn assign(&mut self, slot: usize, selection: &RawSelection) -> PhotoResult<()> {
        self.check_assignable(slot)?;
        let image = self.normalizer.normalize(selection)?;
        self.store(slot, image);
        Ok(())
    }

    /// Empty `slot`. Later slots are left where they are.
    pub fn remove(&mut self, slot: usize) -> PhotoResult<()> {
        self.check_range(slot)?;
        if self.slots[slot].take().is_some() {
            info!("photo slot {} cleared", slot);
        }
        Ok(())
    }

    /// Empty every slot (form reset).
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Primary plus the contiguous run of extras after it.
    pub fn to_payload(&self) -> ProductImages {
        let mut run = self
            .slots
            .iter()
            .map_while(|slot| slot.as_ref())
            .map(|image| image.encoded_bytes().to_vec());

        ProductImages {
            primary: run.next(),
            extras: run.collect(),
        }
    }

    /// Occupied slots, gaps included.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() == self.capacity()
    }

    pub fn get(&self, slot: usize) -> Option<&NormalizedImage> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn primary(&self) -> Option<&NormalizedImage> {
        self.get(0)
    }

    /// First empty slot that may be assigned, if any.
    pub fn next_open_slot(&self) -> Option<usize> {
        (0..self.capacity()).find(|&slot| self.slots[slot].is_none() && self.check_assignable(slot).is_ok())
    }

    /// True when a filled slot follows an empty one.
    pub fn has_gap(&self) -> bool {
        self.slots
            .windows(2)
            .any(|pair| pair[0].is_none() && pair[1].is_some())
    }

    /// Slot-order and range checks for `assign`.
    pub fn check_assignable(&self, slot: usize) -> PhotoResult<()> {
        self.check_range(slot)?;
        if slot > 0 && self.slots[slot - 1].is_none() {
            return Err(PhotoError::SlotOrderViolation {
                slot,
                missing: slot - 1,
            });
        }
        Ok(())
    }

    fn check_range(&self, slot: usize) -> PhotoResult<()> {
        if slot >= self.slots.len() {
            return Err(PhotoError::SlotOutOfRange {
                slot,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    fn store(&mut self, slot: usize, image: NormalizedImage) {
        let replaced = self.slots[slot].replace(image).is_some();
        info!(
            "photo slot {} {} ({}/{} filled)",
            slot,
            if replaced { "replaced" } else { "filled" },
            self.count(),
            self.capacity()
        );
    }
}

impl<C> PhotoSlotManager<C>
where
    C: ImageCodec + Clone + Send + 'static,
{
    /// [`assign`](Self::assign) with the normalization run on the blocking pool.
    ///
    /// There is no cancellation: dropping the future does not stop the
    /// encode, it only discards the result.
    pub async fn assign_async(&mut self, slot: usize, selection: RawSelection) -> PhotoResult<()> {
        self.check_assignable(slot)?;
        let normalizer = self.normalizer.clone();
        let image = tokio::task::spawn_blocking(move || normalizer.normalize(&selection)).await??;
        self.store(slot, image);
        Ok(())
    }
}
