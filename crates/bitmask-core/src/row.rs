use std::ops::Range;

/// Storage word of a [`BitRow`].
pub type Word = u64;

/// Number of bits held by one [`Word`].
pub const WORD_BITS: usize = Word::BITS as usize;

/// Number of words needed to hold `width` bits.
pub(crate) fn words_for(width: usize) -> usize {
    width.div_ceil(WORD_BITS)
}

/// Mask with the low `n` bits set, `n` in `0..=WORD_BITS`.
fn low_mask(n: usize) -> Word {
    if n >= WORD_BITS {
        Word::MAX
    } else {
        (1 << n) - 1
    }
}

/// Bitwise operation applied by [`BitRow::combine`] and `BitGrid::combine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// Keep bits set in both operands.
    And,
    /// Keep bits set in either operand.
    Or,
    /// Keep bits set in exactly one operand.
    Xor,
    /// Keep bits set in `this` but not in `other`.
    Diff,
}

impl CombineOp {
    /// Apply the operation to one word of each operand.
    #[inline]
    pub fn apply(self, dst: Word, src: Word) -> Word {
        match self {
            CombineOp::And => dst & src,
            CombineOp::Or => dst | src,
            CombineOp::Xor => dst ^ src,
            CombineOp::Diff => dst & !src,
        }
    }
}

/// One scanline of bits packed into [`Word`]s.
///
/// Bit `x` lives in word `x / WORD_BITS` at position `x % WORD_BITS`, least
/// significant bit first. Padding bits past `width` in the last word are
/// always zero, which keeps population counts and shifted reads exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitRow {
    width: usize,
    words: Box<[Word]>,
}

impl BitRow {
    /// Create a cleared row of `width` bits.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            words: vec![0; words_for(width)].into_boxed_slice(),
        }
    }

    /// Number of addressable bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The packed storage words.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Read bit `x`, out-of-range reads are false.
    #[inline]
    pub fn get(&self, x: usize) -> bool {
        if x >= self.width {
            return false;
        }
        self.words[x / WORD_BITS] & (1 << (x % WORD_BITS)) != 0
    }

    /// Write bit `x`, out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, value: bool) {
        if x >= self.width {
            return;
        }
        let word = &mut self.words[x / WORD_BITS];
        let bit = 1 << (x % WORD_BITS);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Set every addressable bit.
    pub fn fill(&mut self) {
        self.words.fill(Word::MAX);
        self.mask_tail();
    }

    /// Clear every bit.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Flip every addressable bit.
    pub fn invert(&mut self) {
        self.words.iter_mut().for_each(|w| *w = !*w);
        self.mask_tail();
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Column of the lowest set bit.
    pub fn first_one(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|&(_, &w)| w != 0)
            .map(|(i, w)| i * WORD_BITS + w.trailing_zeros() as usize)
    }

    /// Column of the highest set bit.
    pub fn last_one(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &w)| w != 0)
            .map(|(i, w)| i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize))
    }

    /// Columns of the set bits in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(i, &w)| WordBits(w).map(move |b| i * WORD_BITS + b))
    }

    /// The `WORD_BITS` bits starting at column `start`, bit 0 of the result
    /// being column `start`. Columns outside the row read as zero, so
    /// `start` may be negative or past the end.
    #[inline]
    pub fn shifted_word(&self, start: isize) -> Word {
        let bits = WORD_BITS as isize;
        let index = start.div_euclid(bits);
        let offset = start.rem_euclid(bits) as u32;
        let lo = self.word_at(index);
        if offset == 0 {
            lo
        } else {
            (lo >> offset) | (self.word_at(index + 1) << (WORD_BITS as u32 - offset))
        }
    }

    /// Combine `other` into this row in place, where column `x` of this row
    /// meets column `x - shift` of `other`.
    ///
    /// Every column of this row takes part: columns with no counterpart in
    /// `other` see a zero bit, so [`CombineOp::And`] clears them.
    pub fn combine(&mut self, other: &BitRow, op: CombineOp, shift: isize) {
        for (i, dst) in self.words.iter_mut().enumerate() {
            let src = other.shifted_word((i * WORD_BITS) as isize - shift);
            *dst = op.apply(*dst, src);
        }
        self.mask_tail();
    }

    /// Like [`BitRow::combine`] but only the columns in `cols` are touched.
    pub fn combine_span(&mut self, other: &BitRow, op: CombineOp, shift: isize, cols: Range<usize>) {
        let cols = cols.start..cols.end.min(self.width);
        for i in span_words(&cols) {
            let mask = span_mask(&cols, i);
            let src = other.shifted_word((i * WORD_BITS) as isize - shift);
            let dst = self.words[i];
            self.words[i] = (dst & !mask) | (op.apply(dst, src) & mask);
        }
    }

    /// Number of columns in `cols` set in this row and in `other` at `x - shift`.
    pub fn overlap_count(&self, other: &BitRow, shift: isize, cols: Range<usize>) -> usize {
        let cols = cols.start..cols.end.min(self.width);
        span_words(&cols)
            .map(|i| {
                let src = other.shifted_word((i * WORD_BITS) as isize - shift);
                (self.words[i] & src & span_mask(&cols, i)).count_ones() as usize
            })
            .sum()
    }

    /// Lowest column in `cols` set in this row and in `other` at `x - shift`.
    pub fn first_overlap(&self, other: &BitRow, shift: isize, cols: Range<usize>) -> Option<usize> {
        let cols = cols.start..cols.end.min(self.width);
        span_words(&cols).find_map(|i| {
            let src = other.shifted_word((i * WORD_BITS) as isize - shift);
            let hits = self.words[i] & src & span_mask(&cols, i);
            (hits != 0).then(|| i * WORD_BITS + hits.trailing_zeros() as usize)
        })
    }

    #[inline]
    fn word_at(&self, index: isize) -> Word {
        if index < 0 {
            return 0;
        }
        self.words.get(index as usize).copied().unwrap_or(0)
    }

    fn mask_tail(&mut self) {
        let used = self.width % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= low_mask(used);
            }
        }
    }
}

/// Word indices intersecting the column range.
fn span_words(cols: &Range<usize>) -> Range<usize> {
    if cols.is_empty() {
        return 0..0;
    }
    cols.start / WORD_BITS..words_for(cols.end)
}

/// Bits of word `index` whose columns fall inside `cols`.
fn span_mask(cols: &Range<usize>, index: usize) -> Word {
    let base = index * WORD_BITS;
    let lo = cols.start.saturating_sub(base).min(WORD_BITS);
    let hi = cols.end.saturating_sub(base).min(WORD_BITS);
    low_mask(hi) & !low_mask(lo)
}

/// Positions of the set bits of a word, lowest first.
struct WordBits(Word);

impl Iterator for WordBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
