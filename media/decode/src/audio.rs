/*!
    Audio decode pipeline.

    Decodes the best audio stream of a container into interleaved signed
    16-bit PCM at the source sample rate, normalizing only channel layout
    (capped at stereo) and sample format. Absence of a stream or of a
    usable decoder is a recoverable condition and yields an empty result.
*/

use std::path::Path;

use ffmpeg_next::{
    codec, format,
    format::sample::{Sample, Type as SampleType},
    frame, media,
    software::resampling,
    util::channel_layout::ChannelLayout,
};

use media_types::{CancelToken, DecodedAudio};

use crate::{ensure_init, waveform::build_waveform};

/**
    Decode the best audio stream of `path` into interleaved S16 PCM.

    Never fails: any container- or stream-level problem yields
    `DecodedAudio::empty()`. Cancellation is polled once per packet;
    a cancelled decode returns the samples gathered so far, which is a
    partial but valid result.
*/
pub fn decode_audio<P: AsRef<Path>>(path: P, cancel: &CancelToken) -> DecodedAudio {
    let path = path.as_ref();

    if ensure_init().is_err() {
        return DecodedAudio::empty();
    }

    let Ok(mut ictx) = format::input(&path) else {
        return DecodedAudio::empty();
    };

    let Some(stream) = ictx.streams().best(media::Type::Audio) else {
        return DecodedAudio::empty();
    };
    let stream_index = stream.index();

    let Ok(context) = codec::context::Context::from_parameters(stream.parameters()) else {
        return DecodedAudio::empty();
    };
    let Ok(mut decoder) = context.decoder().audio() else {
        return DecodedAudio::empty();
    };

    let sample_rate = decoder.rate();
    if sample_rate == 0 {
        return DecodedAudio::empty();
    }

    // Only channel layout and sample format are normalized; the output
    // keeps the source sample rate.
    let out_channels = decoder.channels().clamp(1, 2);
    let out_layout = match out_channels {
        1 => ChannelLayout::MONO,
        _ => ChannelLayout::STEREO,
    };

    let Ok(mut resampler) = resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        sample_rate,
        Sample::I16(SampleType::Packed),
        out_layout,
        sample_rate,
    ) else {
        return DecodedAudio::empty();
    };

    let mut samples: Vec<i16> = Vec::new();
    let mut decoded = frame::Audio::empty();
    let mut converted = frame::Audio::empty();
    let mut cancelled = false;

    for (stream, packet) in ictx.packets() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        if stream.index() != stream_index {
            continue;
        }
        if decoder.send_packet(&packet).is_err() {
            continue;
        }
        while decoder.receive_frame(&mut decoded).is_ok() {
            if resampler.run(&decoded, &mut converted).is_ok() {
                append_packed_s16(&converted, out_channels, &mut samples);
            }
        }
    }

    // Drain codec-internal buffers only on a normal end of stream; a
    // cancelled decode stops where it is.
    if !cancelled && decoder.send_eof().is_ok() {
        while decoder.receive_frame(&mut decoded).is_ok() {
            if resampler.run(&decoded, &mut converted).is_ok() {
                append_packed_s16(&converted, out_channels, &mut samples);
            }
        }
    }

    if samples.is_empty() {
        return DecodedAudio::empty();
    }

    let waveform = build_waveform(&samples, out_channels);
    DecodedAudio {
        samples,
        sample_rate,
        channels: out_channels,
        waveform,
    }
}

/**
    Append the packed S16 payload of a converted frame to `samples`.
*/
fn append_packed_s16(converted: &frame::Audio, channels: u16, samples: &mut Vec<i16>) {
    let count = converted.samples() * channels as usize;
    if count == 0 {
        return;
    }

    let data = converted.data(0);
    let bytes = count * size_of::<i16>();
    if data.len() < bytes {
        return;
    }

    samples.reserve(count);
    for chunk in data[..bytes].chunks_exact(2) {
        samples.push(i16::from_ne_bytes([chunk[0], chunk[1]]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_not_error() {
        let result = decode_audio("/nonexistent/audio.wav", &CancelToken::new());
        assert!(result.is_empty());
    }

    #[test]
    fn pre_cancelled_token_yields_empty_partial() {
        // Cancellation is observed at the first packet, before any
        // samples are decoded. The result is empty but still valid.
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = decode_audio("/nonexistent/audio.wav", &cancel);
        assert!(result.is_empty());
    }
}
