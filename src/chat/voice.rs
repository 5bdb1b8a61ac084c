use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    BlobEvent, Event, MediaRecorder, MediaStream, MediaStreamConstraints, MediaStreamTrack,
};

use crate::error::{AppError, AppResult};

/// Microphone capture through `MediaRecorder`.
///
/// Recording runs without a timeslice, so captured audio is flushed once,
/// after `stop()`. Both handlers stay attached until the recorder is
/// dropped; keep it alive until the stop event has been seen.
pub struct VoiceRecorder {
    recorder: MediaRecorder,
    stream: MediaStream,
    stopped: bool,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(Event)>,
}

impl VoiceRecorder {
    /// Ask for an audio stream and start recording. `on_data` runs when
    /// non-empty audio is flushed, `on_stop` once the recorder has shut down.
    pub async fn start(
        on_data: impl Fn() + 'static,
        on_stop: impl Fn() + 'static,
    ) -> AppResult<Self> {
        let devices = gloo_utils::window()
            .navigator()
            .media_devices()
            .map_err(|e| AppError::media(&e))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| AppError::media(&e))?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| AppError::media(&e))?
            .dyn_into()
            .map_err(|v| AppError::media(&v))?;

        let recorder = match MediaRecorder::new_with_media_stream(&stream) {
            Ok(recorder) => recorder,
            Err(e) => {
                stop_tracks(&stream);
                return Err(AppError::media(&e));
            }
        };

        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if event.data().is_some_and(|blob| blob.size() > 0.0) {
                on_data();
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        let on_stop = Closure::<dyn FnMut(Event)>::new(move |_: Event| on_stop());
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        let mut voice = Self {
            recorder,
            stream,
            stopped: false,
            _on_data: on_data,
            _on_stop: on_stop,
        };
        if let Err(e) = voice.recorder.start() {
            voice.stop();
            return Err(AppError::media(&e));
        }

        log::debug!("voice recording started");
        Ok(voice)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stop recording and release the microphone. The final flush and the
    /// stop event follow asynchronously.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(e) = self.recorder.stop() {
            log::debug!("recorder already inactive: {e:?}");
        }
        stop_tracks(&self.stream);
    }
}

impl Drop for VoiceRecorder {
    fn drop(&mut self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
        self.stop();
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}
