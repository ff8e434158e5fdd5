/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
#![forbid(unsafe_code)]
use crate::format::{BytesPacking, Endianness};
use num_traits::AsPrimitive;

#[inline(always)]
/// Saturating rounding shift right against bit depth
pub(crate) fn qrshr<const PRECISION: i32, const BIT_DEPTH: usize>(val: i32) -> i32 {
    let rounding: i32 = 1 << (PRECISION - 1);
    let max_value: i32 = (1 << BIT_DEPTH) - 1;
    ((val + rounding) >> PRECISION).min(max_value).max(0)
}

#[inline(always)]
/// Assembles one 16-bit storage cell from two stream bytes.
pub(crate) fn read_cell<const ENDIANNESS: u8>(bytes: [u8; 2]) -> u16 {
    let endianness: Endianness = ENDIANNESS.into();
    match endianness {
        Endianness::BigEndian => u16::from_be_bytes(bytes),
        Endianness::LittleEndian => u16::from_le_bytes(bytes),
    }
}

#[inline(always)]
/// Reduces one 16-bit storage cell to the top 8 significant bits.
pub(crate) fn narrow_cell<const BYTES_POSITION: u8, const BIT_DEPTH: usize>(v: u16) -> u8 {
    let bytes_position: BytesPacking = BYTES_POSITION.into();
    match bytes_position {
        BytesPacking::MostSignificantBytes => (v >> 8) as u8,
        BytesPacking::LeastSignificantBytes => {
            let mask = ((1u32 << BIT_DEPTH) - 1) as u16;
            ((v & mask) >> (BIT_DEPTH - 8)) as u8
        }
    }
}

#[inline(always)]
pub(crate) fn narrow16<const ENDIANNESS: u8, const BYTES_POSITION: u8, const BIT_DEPTH: usize>(
    bytes: [u8; 2],
) -> u8 {
    narrow_cell::<BYTES_POSITION, BIT_DEPTH>(read_cell::<ENDIANNESS>(bytes))
}

#[inline(always)]
pub(crate) fn read_cell_dyn(bytes: [u8; 2], endianness: Endianness) -> u16 {
    match endianness {
        Endianness::BigEndian => u16::from_be_bytes(bytes),
        Endianness::LittleEndian => u16::from_le_bytes(bytes),
    }
}

#[inline(always)]
/// Moves the significant bits of a cell down to bit zero.
pub(crate) fn align_cell_dyn(v: u16, packing: BytesPacking, depth: u32) -> u16 {
    match packing {
        BytesPacking::MostSignificantBytes => v >> (16 - depth),
        BytesPacking::LeastSignificantBytes => v & (((1u32 << depth) - 1) as u16),
    }
}

#[inline(always)]
/// Narrows a bit-aligned component of `depth` significant bits to 8 bits.
pub(crate) fn narrow_component<T: Copy + 'static + AsPrimitive<u32>>(v: T, depth: u32) -> u8 {
    let wide: u32 = v.as_();
    (wide >> (depth - 8)).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn qrshr_rounds_and_clamps() {
        assert_eq!(qrshr::<13, 8>(0), 0);
        assert_eq!(qrshr::<13, 8>(255 << 13), 255);
        assert_eq!(qrshr::<13, 8>((255 << 13) + (1 << 12)), 255);
        assert_eq!(qrshr::<13, 8>(-5000), 0);
        assert_eq!(qrshr::<13, 8>((100 << 13) + (1 << 12)), 101);
        assert_eq!(qrshr::<13, 8>((100 << 13) + (1 << 12) - 1), 100);
    }

    #[test]
    fn narrow_known_cells() {
        // 10-bit sample 0x2A7 stored least significant, little-endian.
        let cell = 0x02A7u16;
        assert_eq!(
            narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::LeastSignificantBytes as u8 },
                10,
            >(cell.to_le_bytes()),
            (0x2A7 >> 2) as u8
        );
        // Same sample aligned to the most significant bits.
        let cell_msb = 0x2A7u16 << 6;
        assert_eq!(
            narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::MostSignificantBytes as u8 },
                10,
            >(cell_msb.to_le_bytes()),
            (cell_msb >> 8) as u8
        );
        // Big-endian byte order carries the high byte first.
        assert_eq!(
            narrow16::<
                { Endianness::BigEndian as u8 },
                { BytesPacking::LeastSignificantBytes as u8 },
                16,
            >([0xAB, 0xCD]),
            0xAB
        );
    }

    #[test]
    fn narrow_is_monotonic() {
        let mut rng = rand::rng();
        for _ in 0..4000 {
            let a = rng.random_range(0..1024u16);
            let b = rng.random_range(0..1024u16);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_n = narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::LeastSignificantBytes as u8 },
                10,
            >(lo.to_le_bytes());
            let hi_n = narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::LeastSignificantBytes as u8 },
                10,
            >(hi.to_le_bytes());
            assert!(lo_n <= hi_n, "narrow not monotonic: {} -> {}, {} -> {}", lo, lo_n, hi, hi_n);

            let lo_m = narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::MostSignificantBytes as u8 },
                10,
            >((lo << 6).to_le_bytes());
            let hi_m = narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::MostSignificantBytes as u8 },
                10,
            >((hi << 6).to_le_bytes());
            assert!(lo_m <= hi_m);
        }
    }

    #[test]
    fn dyn_path_agrees_with_const_path() {
        let mut rng = rand::rng();
        for _ in 0..2000 {
            let raw = rng.random_range(0..4096u16);
            let via_const = narrow16::<
                { Endianness::LittleEndian as u8 },
                { BytesPacking::LeastSignificantBytes as u8 },
                12,
            >(raw.to_le_bytes());
            let cell = read_cell_dyn(raw.to_le_bytes(), Endianness::LittleEndian);
            let aligned = align_cell_dyn(cell, BytesPacking::LeastSignificantBytes, 12);
            assert_eq!(via_const, narrow_component(aligned, 12));
        }
    }

    #[test]
    fn narrow_component_depths() {
        assert_eq!(narrow_component(200u8, 8), 200);
        assert_eq!(narrow_component(0x3FFu16, 10), 255);
        assert_eq!(narrow_component(0x0FFFu16, 12), 255);
        assert_eq!(narrow_component(40u16, 10), 10);
    }
}
