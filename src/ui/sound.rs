/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use std::f32::consts::PI;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{gen_goal, gen_kick, gen_miss, gen_save, make_wav};

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_kick: Arc<Vec<u8>>,
        sfx_goal: Arc<Vec<u8>>,
        sfx_save: Arc<Vec<u8>>,
        sfx_miss: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("sound: no output device ({e})");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_kick: Arc::new(make_wav(&gen_kick())),
                sfx_goal: Arc::new(make_wav(&gen_goal())),
                sfx_save: Arc::new(make_wav(&gen_save())),
                sfx_miss: Arc::new(make_wav(&gen_miss())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_kick(&self) { self.play(&self.sfx_kick); }
        pub fn play_goal(&self) { self.play(&self.sfx_goal); }
        pub fn play_save(&self) { self.play(&self.sfx_save); }
        pub fn play_miss(&self) { self.play(&self.sfx_miss); }
    }
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

// ════════════════════════════════════════════════════════════
//  Waveform generators — all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

/// Sequence of sine-ish notes with a linear decay per note.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_notes(notes: &[(f32, f32)], decay: f32, volume: f32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &(freq, dur) in notes {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * decay;
            let wave = (t * freq * 2.0 * PI).sin() * 0.7
                + (t * freq * 2.0 * 2.0 * PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }
    samples
}

/// Kick: short thump, low tone under a noise burst
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_kick() -> Vec<f32> {
    let duration = 0.08;
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut rng: u32 = 12345;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = 90.0 + (1.0 - t) * 120.0; // falling thump
            let ti = i as f32 / SAMPLE_RATE as f32;
            let tone = (ti * freq * 2.0 * PI).sin();
            // Simple LCG noise
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let env = (1.0 - t).powf(1.5);
            (tone * 0.7 + noise * 0.3) * env * 0.4
        })
        .collect()
}

/// Goal: ascending fanfare C5→E5→G5→C6 with a held top note
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_goal() -> Vec<f32> {
    gen_notes(
        &[(523.0, 0.09), (659.0, 0.09), (784.0, 0.09), (1047.0, 0.3)],
        0.5,
        0.3,
    )
}

/// Save: two flat descending notes
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_save() -> Vec<f32> {
    gen_notes(&[(392.0, 0.1), (262.0, 0.2)], 0.8, 0.3)
}

/// Miss: sliding whistle 700Hz → 250Hz
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_miss() -> Vec<f32> {
    let duration = 0.25;
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = 700.0 - t * 450.0;
            phase += freq / SAMPLE_RATE as f32;
            let env = (1.0 - t).powf(0.6);
            (phase * 2.0 * PI).sin() * env * 0.25
        })
        .collect()
}

// ════════════════════════════════════════════════════════════
//  WAV encoder — wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());

    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_kick(&self) {}
    pub fn play_goal(&self) {}
    pub fn play_save(&self) {}
    pub fn play_miss(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_well_formed() {
        let samples = [0.0_f32, 0.5, -0.5, 2.0];
        let wav = make_wav(&samples);
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 8);
        // out-of-range sample is clamped to full scale
        assert_eq!(i16::from_le_bytes([wav[50], wav[51]]), 32767);
    }

    #[test]
    fn effects_are_short_and_bounded() {
        for sfx in [gen_kick(), gen_goal(), gen_save(), gen_miss()] {
            assert!(!sfx.is_empty());
            assert!(sfx.len() < SAMPLE_RATE as usize); // under a second
            assert!(sfx.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
