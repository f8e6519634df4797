use crate::synth::voice::Voice;

/*
Voice Arena
===========

Fixed-capacity slots for live voices. Capacity is reserved up front, so the
renderer never reallocates while playing.

When every slot is taken, a new voice steals one:

  1. the oldest voice already in its release tail (least audible loss)
  2. otherwise the oldest voice outright

"Oldest" is by start frame. The stolen voice is returned to the caller, which
hands it back to the control thread rather than dropping it on the audio
thread.
*/

pub struct VoiceArena {
    slots: Vec<Option<Voice>>,
}

impl VoiceArena {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.resize_with(capacity.max(1), || None);
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Place a voice, returning whichever voice it displaced.
    pub fn insert(&mut self, voice: Voice) -> Option<Voice> {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(voice);
            return None;
        }

        let victim = self.steal_index();
        self.slots[victim].replace(voice)
    }

    fn steal_index(&self) -> usize {
        let oldest = |releasing_only: bool| {
            self.slots
                .iter()
                .enumerate()
                .filter_map(|(idx, slot)| slot.as_ref().map(|voice| (idx, voice)))
                .filter(|(_, voice)| !releasing_only || voice.is_releasing())
                .min_by_key(|(_, voice)| voice.start_frame())
                .map(|(idx, _)| idx)
        };
        oldest(true).or_else(|| oldest(false)).unwrap_or(0)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.slots.iter_mut().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.slots.iter().flatten()
    }

    /// Take the next finished voice out of its slot.
    pub fn take_finished(&mut self) -> Option<Voice> {
        self.slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(Voice::is_finished))
            .and_then(Option::take)
    }

    /// Put a voice back into an empty slot; used when it could not be retired.
    pub(crate) fn restore(&mut self, voice: Voice) -> Option<Voice> {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(voice);
                None
            }
            None => Some(voice),
        }
    }
}
