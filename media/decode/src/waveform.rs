/*!
    Waveform summary construction.
*/

/// Maximum number of waveform buckets produced for timeline rendering.
pub(crate) const TARGET_BUCKETS: usize = 2000;

/**
    Build a peak-amplitude waveform summary from interleaved PCM.

    Sample-frames are partitioned into at most [`TARGET_BUCKETS`] buckets;
    each bucket holds the maximum absolute amplitude across all samples
    and channels in it, normalized to [0, 1] by dividing by 32768. Inputs
    with fewer frames than the bucket target get one bucket per frame, so
    every frame contributes to exactly one bucket.
*/
pub fn build_waveform(samples: &[i16], channels: u16) -> Vec<f64> {
    if samples.is_empty() || channels == 0 {
        return Vec::new();
    }

    let channels = channels as usize;
    let total_frames = samples.len() / channels;
    if total_frames == 0 {
        return Vec::new();
    }

    let frames_per_bucket = total_frames.div_ceil(TARGET_BUCKETS).max(1);
    let buckets = total_frames.div_ceil(frames_per_bucket);
    let mut waveform = Vec::with_capacity(buckets);

    for bucket in 0..buckets {
        let start = bucket * frames_per_bucket;
        let end = (start + frames_per_bucket).min(total_frames);

        let mut max = 0.0f64;
        for frame in start..end {
            let base = frame * channels;
            for ch in 0..channels {
                // abs in i32 so -32768 does not overflow; it maps to 1.0.
                let amp = (samples[base + ch] as i32).abs() as f64 / 32768.0;
                if amp > max {
                    max = amp;
                }
            }
        }
        waveform.push(max.min(1.0));
    }

    waveform
}
