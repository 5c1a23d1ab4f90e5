//! Six-slot one-time code buffer shared by the reset wizard and email verification.

pub const OTP_LENGTH: usize = 6;

/// One digit per slot, plus where the widget should move keyboard focus next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpBuffer {
    slots: [Option<char>; OTP_LENGTH],
    focus_request: Option<usize>,
}

fn digits(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(char::is_ascii_digit)
}

impl OtpBuffer {
    pub fn slot(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Stores the digit just typed into the slot, or empties it when `text` has none.
    ///
    /// `text` is the box content after the edit, so it may still hold the previous
    /// digit on either side of the new one. Focus advances to the next slot when a
    /// digit was stored.
    pub fn input(&mut self, index: usize, text: &str) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        let mut typed: Vec<char> = digits(text).collect();
        if typed.len() > 1
            && let Some(previous) = *slot
            && let Some(position) = typed.iter().position(|digit| *digit == previous)
        {
            typed.remove(position);
        }
        *slot = typed.last().copied();
        if slot.is_some() && index + 1 < OTP_LENGTH {
            self.focus_request = Some(index + 1);
        }
    }

    /// Backspace on an already empty slot moves focus back one slot.
    pub fn backspace(&mut self, index: usize) {
        if index >= OTP_LENGTH {
            return;
        }
        if self.slots[index].is_none() && index > 0 {
            self.focus_request = Some(index - 1);
        }
    }

    /// Spreads the digits of `text` over the slots from the first one.
    ///
    /// Slots past the pasted digits keep their value. Focus goes to the slot after the
    /// last pasted digit, or the last slot.
    pub fn paste(&mut self, text: &str) {
        let mut count = 0;
        for (slot, digit) in self.slots.iter_mut().zip(digits(text)) {
            *slot = Some(digit);
            count += 1;
        }
        self.focus_request = Some(count.min(OTP_LENGTH - 1));
    }

    /// Filled slots concatenated in order.
    pub fn code(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Takes the pending focus move, if any.
    pub fn take_focus_request(&mut self) -> Option<usize> {
        self.focus_request.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
