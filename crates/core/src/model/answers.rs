/// Per-question record of the selected choice index, in question order.
///
/// Every slot starts unanswered. The vector never changes length after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerVector {
    slots: Vec<Option<usize>>,
}

impl AnswerVector {
    /// Create a vector with `len` unanswered slots.
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Build from explicit slots, mostly useful in tests and fixtures.
    #[must_use]
    pub fn from_slots(slots: Vec<Option<usize>>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The selected choice for a question, or `None` if unanswered or out of range.
    #[must_use]
    pub fn get(&self, question: usize) -> Option<usize> {
        self.slots.get(question).copied().flatten()
    }

    /// Record `choice` for `question`, overwriting any earlier selection.
    ///
    /// Returns `false` without changing anything when `question` is out of range.
    pub fn set(&mut self, question: usize, choice: usize) -> bool {
        match self.slots.get_mut(question) {
            Some(slot) => {
                *slot = Some(choice);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.get(question).is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Index of the first unanswered slot, if any.
    #[must_use]
    pub fn first_unanswered(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// True iff every slot holds a selection.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_unanswered().is_none()
    }
}
