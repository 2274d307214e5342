//! Response body that signals completion.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};

type OnComplete = Box<dyn FnOnce() + Send>;

/// Wraps a response body and runs a callback once it has been fully produced.
///
/// The callback fires at most once: when the inner body reaches end of
/// stream, or when the body is dropped after all of it was sent. A body that
/// errors or is dropped half-way never fires, unless it was marked
/// [`bodiless`](CompletionBody::bodiless), in which case dropping it counts
/// as completion.
pub(crate) struct CompletionBody {
    inner: Body,
    on_complete: Option<OnComplete>,
    complete_on_drop: bool,
}

impl CompletionBody {
    pub(crate) fn new(inner: Body, on_complete: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner,
            on_complete: Some(Box::new(on_complete)),
            complete_on_drop: false,
        }
    }

    /// Mark a response that is never sent on the wire (HEAD, 1xx, 204, 304).
    pub(crate) fn bodiless(mut self, bodiless: bool) -> Self {
        self.complete_on_drop = bodiless;
        self
    }

    fn complete(&mut self) {
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }
}

impl HttpBody for CompletionBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_frame(cx);
        match &poll {
            Poll::Ready(None) => this.complete(),
            Poll::Ready(Some(Ok(_))) if this.inner.is_end_stream() => this.complete(),
            _ => {}
        }
        poll
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CompletionBody {
    fn drop(&mut self) {
        if self.complete_on_drop || self.inner.is_end_stream() {
            self.complete();
        }
    }
}
