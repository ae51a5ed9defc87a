//! `rodio`-backed implementation of the output boundary.
//!
//! Sinks cannot rewind, so stop and seek rebuild the sink at the requested
//! offset via `Source::skip_duration`; elapsed time is tracked with a start
//! instant plus the time accumulated before the last pause.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::output::{AudioBackend, AudioEvent, AudioOutput, LoadError};

/// Create a paused `Sink` for `path` that starts playback at `start_at`,
/// along with the decoder-reported total duration.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Backend over the default audio device.
pub struct RodioBackend {
    stream: Rc<OutputStream>,
}

impl RodioBackend {
    /// Open the default output device. Everything here lives on the engine
    /// thread, which is also where this must be called: the underlying
    /// stream is not `Send`.
    pub fn open_default() -> Self {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for an embedding application.
        stream.log_on_drop(false);
        Self {
            stream: Rc::new(stream),
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, source: &Path) -> Result<Box<dyn AudioOutput>, LoadError> {
        let (sink, total) = create_sink_at(&self.stream, source, Duration::ZERO)?;
        Ok(Box::new(RodioOutput {
            stream: self.stream.clone(),
            path: source.to_path_buf(),
            sink,
            total,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            pending_loaded: true,
            eos_reported: false,
            failure: None,
        }))
    }
}

struct RodioOutput {
    stream: Rc<OutputStream>,
    path: PathBuf,
    sink: Sink,
    total: Option<Duration>,
    paused: bool,
    // Start time of the current play stretch and elapsed time accumulated
    // before it.
    started_at: Option<Instant>,
    accumulated: Duration,
    pending_loaded: bool,
    eos_reported: bool,
    failure: Option<String>,
}

impl RodioOutput {
    /// Swap in a fresh sink positioned at `offset`. The old sink is stopped
    /// first so the streams never overlap.
    fn rebuild_at(&mut self, offset: Duration) {
        self.sink.stop();
        match create_sink_at(&self.stream, &self.path, offset) {
            Ok((sink, total)) => {
                let volume = self.sink.volume();
                sink.set_volume(volume);
                self.sink = sink;
                if total.is_some() {
                    self.total = total;
                }
                self.accumulated = offset;
                self.started_at = None;
                self.paused = true;
                self.eos_reported = false;
            }
            Err(e) => {
                // The source went away under us; report it on the next poll.
                self.failure = Some(e.to_string());
            }
        }
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self) {
        if self.paused {
            self.sink.play();
            self.started_at = Some(Instant::now());
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            self.sink.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
        }
    }

    fn stop(&mut self) {
        self.rebuild_at(Duration::ZERO);
    }

    fn seek(&mut self, position: Duration) {
        let was_paused = self.paused;
        self.rebuild_at(position);
        if !was_paused && self.failure.is_none() {
            self.play();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn poll_event(&mut self) -> Option<AudioEvent> {
        if let Some(message) = self.failure.take() {
            return Some(AudioEvent::Failed(message));
        }
        if self.pending_loaded {
            self.pending_loaded = false;
            return Some(AudioEvent::Loaded(self.total));
        }
        if !self.paused && !self.eos_reported && self.sink.empty() {
            self.eos_reported = true;
            return Some(AudioEvent::EndOfStream);
        }
        None
    }
}
