/// A coarse equivalence class of pixel formats sharing per-channel bit
/// widths.
///
/// Layouts drive the first phase of the decoder/allocator handshake: a
/// decoder announces the tightest layout matching the on-disk encoding plus
/// the layouts it is willing to losslessly widen into, and the allocator
/// picks one. Channel *order* is deliberately not part of a layout;
/// `R8G8B8A8` and `B8G8R8A8` are both `_8_8_8_8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
pub enum FormatLayout {
    _8,
    _8_8,
    _4_4_4_4,
    _5_6_5,
    _5_5_5_1,
    _8_8_8,
    _8_8_8_8,
    _9_9_9_5,
    _10_10_10_2,
    _11_11_10,
    _16,
    _16_16,
    _16_16_16,
    _16_16_16_16,
    _32,
    _32_32,
    _32_32_32,
    _32_32_32_32,
    /// Block-compressed formats. Never widened.
    Block,
}

impl FormatLayout {
    /// The layouts that can losslessly hold any value of this layout,
    /// ordered narrowest first.
    ///
    /// This is the "wider" relation of the layout lattice. A decoder offers
    /// a subset of this list in the negotiation's layout phase.
    pub const fn wider(self) -> &'static [FormatLayout] {
        use FormatLayout::*;
        match self {
            _8 => &[
                _8_8_8,
                _8_8_8_8,
                _10_10_10_2,
                _16_16_16,
                _16_16_16_16,
                _32_32_32,
                _32_32_32_32,
            ],
            _8_8 => &[_8_8_8_8, _16_16_16_16, _32_32_32_32],
            _4_4_4_4 => &[_8_8_8_8, _16_16_16_16, _32_32_32_32],
            _5_6_5 => &[
                _8_8_8,
                _8_8_8_8,
                _10_10_10_2,
                _16_16_16,
                _16_16_16_16,
                _32_32_32,
                _32_32_32_32,
            ],
            _5_5_5_1 => &[_8_8_8_8, _10_10_10_2, _16_16_16_16, _32_32_32_32],
            _8_8_8 => &[
                _8_8_8_8,
                _10_10_10_2,
                _16_16_16,
                _16_16_16_16,
                _32_32_32,
                _32_32_32_32,
            ],
            _8_8_8_8 => &[_16_16_16_16, _32_32_32_32],
            _9_9_9_5 => &[_16_16_16, _16_16_16_16, _32_32_32, _32_32_32_32],
            _10_10_10_2 => &[_16_16_16_16, _32_32_32_32],
            _11_11_10 => &[_16_16_16, _16_16_16_16, _32_32_32, _32_32_32_32],
            _16 => &[_16_16_16, _16_16_16_16, _32, _32_32_32, _32_32_32_32],
            _16_16 => &[_16_16_16_16, _32_32, _32_32_32_32],
            _16_16_16 => &[_16_16_16_16, _32_32_32, _32_32_32_32],
            _16_16_16_16 => &[_32_32_32_32],
            _32 => &[_32_32_32, _32_32_32_32],
            _32_32 => &[_32_32_32_32],
            _32_32_32 => &[_32_32_32_32],
            _32_32_32_32 => &[],
            Block => &[],
        }
    }

    /// Whether `other` is this layout or one of its wider layouts.
    pub fn can_hold_in(self, other: FormatLayout) -> bool {
        self == other || self.wider().contains(&other)
    }
}
