use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::{tick_to_sample, Track};

/// Commands the render thread sends to the audio worker. Everything that
/// can block (device open, stream restart) happens on the worker so the
/// render loop never stalls on audio I/O.
enum TransportCommand {
    Play {
        track: Arc<Track>,
        start_sample: usize,
    },
    Pause,
    Stop,
    Shutdown,
}

/// State shared between the render thread and the audio worker. This is
/// the complete set; everything else is owned by exactly one thread.
struct TransportShared {
    /// Render ticks since `start()`. Approximates the playback position
    /// in render-tick units, not device-consumed samples.
    tick: AtomicU64,
    paused: AtomicBool,
    /// Cleared once if the output device could not be opened.
    device_ready: AtomicBool,
}

/// Owns playback of the current track: the play/pause state, the tick
/// counter and, through its worker thread, the audio output stream.
pub struct PlaybackTransport {
    shared: Arc<TransportShared>,
    commands: Sender<TransportCommand>,
    worker: Option<JoinHandle<()>>,
    track: Option<Arc<Track>>,
    tick_rate: u32,
}

impl PlaybackTransport {
    /// Spawns the audio worker. The output device is opened lazily on
    /// the worker; an unavailable device is reported there exactly once
    /// and the transport then runs in silent, visual-only mode.
    pub fn new(tick_rate: u32) -> Self {
        let shared = Arc::new(TransportShared {
            tick: AtomicU64::new(0),
            paused: AtomicBool::new(false),
            device_ready: AtomicBool::new(true),
        });

        let (tx, rx) = crossbeam_channel::unbounded();
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || run_worker(rx, worker_shared))
            .ok();

        if worker.is_none() {
            warn!("failed to spawn audio worker; playback disabled");
            shared.device_ready.store(false, Ordering::Relaxed);
        }

        Self {
            shared,
            commands: tx,
            worker,
            track: None,
            tick_rate,
        }
    }

    /// Begins streaming the full buffer from the start and resets the
    /// tick counter. Calling this with a new track is the track-switch
    /// path: the previous track and its position are discarded together.
    pub fn start(&mut self, track: Arc<Track>) -> Result<()> {
        self.shared.tick.store(0, Ordering::Relaxed);
        self.shared.paused.store(false, Ordering::Relaxed);
        self.track = Some(Arc::clone(&track));
        self.commands.send(TransportCommand::Play {
            track,
            start_sample: 0,
        })?;
        Ok(())
    }

    /// Pausing stops the output stream (not a mute) and freezes the tick
    /// counter. Resuming restarts the stream at the tick-derived sample
    /// offset; because ticks count render iterations rather than
    /// device-consumed samples, repeated pause/resume cycles accumulate
    /// drift.
    pub fn toggle_pause(&mut self) -> Result<()> {
        let Some(track) = self.track.clone() else {
            return Ok(());
        };

        let was_paused = self.shared.paused.fetch_xor(true, Ordering::Relaxed);
        if was_paused {
            let start_sample = self.resume_offset();
            debug!("resuming at sample {}", start_sample);
            self.commands.send(TransportCommand::Play {
                track,
                start_sample,
            })?;
        } else {
            self.commands.send(TransportCommand::Pause)?;
        }
        info!(
            "playback {}",
            if was_paused { "resumed" } else { "paused" }
        );
        Ok(())
    }

    /// Sample offset playback restarts from on resume.
    pub fn resume_offset(&self) -> usize {
        let sample_rate = self.track.as_ref().map_or(0, |t| t.sample_rate);
        tick_to_sample(self.current_frame(), sample_rate, self.tick_rate)
    }

    /// Advances the position clock by one render iteration; no-op while
    /// paused.
    pub fn advance_tick(&self) {
        if !self.is_paused() {
            self.shared.tick.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn current_frame(&self) -> u64 {
        self.shared.tick.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Relaxed)
    }

    /// True while a track is loaded, playback is not paused, and the
    /// tick-derived position is still inside the sample buffer.
    pub fn is_active(&self) -> bool {
        let Some(track) = &self.track else {
            return false;
        };
        if self.is_paused() {
            return false;
        }
        let position = tick_to_sample(self.current_frame(), track.sample_rate, self.tick_rate);
        position < track.samples.len()
    }

    /// True if the output device could be opened. Visualization runs
    /// either way.
    pub fn audio_available(&self) -> bool {
        self.shared.device_ready.load(Ordering::Relaxed)
    }

    pub fn track(&self) -> Option<&Arc<Track>> {
        self.track.as_ref()
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Stops the stream. Called on quit before the window goes away so
    /// the output device is released before process exit.
    pub fn stop(&mut self) {
        let _ = self.commands.send(TransportCommand::Stop);
    }
}

impl Drop for PlaybackTransport {
    fn drop(&mut self) {
        let _ = self.commands.send(TransportCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Audio worker loop. Owns the rodio output stream and sink; the stream
/// handle never crosses threads. Reads only the immutable sample buffer.
fn run_worker(commands: Receiver<TransportCommand>, shared: Arc<TransportShared>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(err) => {
            // Reported once; no retry. Playback stays disabled while the
            // visualization continues on a zero spectrum.
            warn!("audio device unavailable, continuing without sound: {err}");
            shared.device_ready.store(false, Ordering::Relaxed);
            for command in commands.iter() {
                if matches!(command, TransportCommand::Shutdown) {
                    break;
                }
            }
            return;
        }
    };
    // Keep the stream alive for as long as the worker runs.
    let _stream = stream;

    let mut sink: Option<Sink> = None;

    for command in commands.iter() {
        match command {
            TransportCommand::Play {
                track,
                start_sample,
            } => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                let start = start_sample.min(track.samples.len());
                let tail = track.samples[start..].to_vec();
                match Sink::try_new(&handle) {
                    Ok(new_sink) => {
                        new_sink.append(SamplesBuffer::new(1, track.sample_rate, tail));
                        sink = Some(new_sink);
                    }
                    Err(err) => warn!("failed to open playback sink: {err}"),
                }
            }
            TransportCommand::Pause => {
                if let Some(current) = sink.take() {
                    current.stop();
                }
            }
            TransportCommand::Stop => {
                if let Some(current) = sink.take() {
                    current.stop();
                }
            }
            TransportCommand::Shutdown => {
                if let Some(current) = sink.take() {
                    current.stop();
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BeatAnalysis;

    fn test_track(seconds: f32) -> Arc<Track> {
        let sample_rate = 44100;
        let samples = vec![0.1f32; (sample_rate as f32 * seconds) as usize];
        crate::audio::build_track(
            "test".into(),
            samples,
            sample_rate,
            BeatAnalysis {
                tempo_bpm: 120.0,
                beat_times: Vec::new(),
            },
        )
    }

    #[test]
    fn ticks_count_render_iterations() {
        let mut transport = PlaybackTransport::new(60);
        transport.start(test_track(1.0)).unwrap();
        for _ in 0..37 {
            transport.advance_tick();
        }
        assert_eq!(transport.current_frame(), 37);
    }

    #[test]
    fn paused_ticks_are_no_ops() {
        let mut transport = PlaybackTransport::new(60);
        transport.start(test_track(1.0)).unwrap();
        for _ in 0..120 {
            transport.advance_tick();
        }
        transport.toggle_pause().unwrap();
        for _ in 0..60 {
            transport.advance_tick();
        }
        assert_eq!(transport.current_frame(), 120);
        transport.toggle_pause().unwrap();
        assert_eq!(transport.current_frame(), 120);
    }

    #[test]
    fn resume_offset_uses_tick_clock() {
        let mut transport = PlaybackTransport::new(60);
        transport.start(test_track(10.0)).unwrap();
        for _ in 0..120 {
            transport.advance_tick();
        }
        transport.toggle_pause().unwrap();
        assert_eq!(transport.resume_offset(), 120 * 44100 / 60);
    }

    #[test]
    fn ten_second_track_runs_600_ticks() {
        let mut transport = PlaybackTransport::new(60);
        transport.start(test_track(10.0)).unwrap();
        for _ in 0..600 {
            transport.advance_tick();
        }
        assert_eq!(transport.current_frame(), 600);
    }

    #[test]
    fn start_resets_the_counter() {
        let mut transport = PlaybackTransport::new(60);
        transport.start(test_track(1.0)).unwrap();
        for _ in 0..50 {
            transport.advance_tick();
        }
        transport.start(test_track(1.0)).unwrap();
        assert_eq!(transport.current_frame(), 0);
        assert!(!transport.is_paused());
    }

    #[test]
    fn activity_tracks_buffer_position() {
        let mut transport = PlaybackTransport::new(60);
        assert!(!transport.is_active());
        transport.start(test_track(1.0)).unwrap();
        assert!(transport.is_active());
        // run one tick past the end of the one-second buffer
        for _ in 0..=60 {
            transport.advance_tick();
        }
        assert!(!transport.is_active());
    }

    #[test]
    fn pause_before_start_is_harmless() {
        let mut transport = PlaybackTransport::new(60);
        transport.toggle_pause().unwrap();
        assert!(!transport.is_paused());
    }
}
