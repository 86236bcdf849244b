//! The interactive loop: one input, one transition, one paint.

use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::io::Write;

use futures::Stream;
use futures::StreamExt;
use phototerm_preview::ImageRenderer;

use crate::error::Result;
use crate::paint::PaintReport;
use crate::paint::RenderDispatcher;
use crate::selection::Input;
use crate::selection::Repaint;
use crate::selection::SelectionController;
use crate::selection::SessionOutcome;
use crate::terminal::TerminalSizeSource;

pub struct Session<R, W, S> {
    controller: SelectionController,
    dispatcher: RenderDispatcher<R>,
    out: W,
    size: S,
}

impl<R, W, S> Session<R, W, S>
where
    R: ImageRenderer,
    W: Write,
    S: TerminalSizeSource,
{
    pub fn new(
        controller: SelectionController,
        dispatcher: RenderDispatcher<R>,
        out: W,
        size: S,
    ) -> Self {
        Self {
            controller,
            dispatcher,
            out,
            size,
        }
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn dispatcher(&self) -> &RenderDispatcher<R> {
        &self.dispatcher
    }

    pub fn out(&self) -> &W {
        &self.out
    }

    /// Paint the current state once.
    pub async fn paint(&mut self, full_repaint: bool) -> Result<PaintReport> {
        let size = self.size.size()?;
        self.dispatcher
            .paint(self.controller.state(), full_repaint, size, &mut self.out)
            .await
    }

    /// Drive the session until it reaches a terminal phase. A closed input
    /// stream counts as a cancel.
    ///
    /// Input keeps being read while a paint waits on the renderer: an
    /// interrupt abandons the paint, anything else is queued and handled in
    /// order once the paint finishes.
    pub async fn run<I>(&mut self, inputs: I) -> Result<SessionOutcome>
    where
        I: Stream<Item = io::Result<Input>> + Unpin,
    {
        let mut inputs = InputQueue::new(inputs);
        if self.paint_or_interrupt(true, &mut inputs).await?.is_none() {
            return Ok(self.interrupted());
        }

        while let Some(input) = inputs.next().await {
            let input = input?;
            let repaint = self.controller.handle(input);
            tracing::trace!(?input, ?repaint, phase = ?self.controller.phase(), "input");

            if let Some(outcome) = self.controller.outcome() {
                return Ok(outcome);
            }
            let painted = match repaint {
                Repaint::None => continue,
                Repaint::Partial => self.paint_or_interrupt(false, &mut inputs).await?,
                Repaint::Full => {
                    if input == Input::Resize {
                        self.dispatcher.invalidate();
                    }
                    self.paint_or_interrupt(true, &mut inputs).await?
                }
            };
            if painted.is_none() {
                return Ok(self.interrupted());
            }
        }

        tracing::debug!("input stream closed");
        self.controller.handle(Input::Cancel);
        Ok(SessionOutcome::Cancelled)
    }

    /// Paint, racing the render against incoming input. `None` means an
    /// interrupt arrived first and the paint was dropped.
    async fn paint_or_interrupt<I>(
        &mut self,
        full_repaint: bool,
        inputs: &mut InputQueue<I>,
    ) -> Result<Option<PaintReport>>
    where
        I: Stream<Item = io::Result<Input>> + Unpin,
    {
        let paint = self.paint(full_repaint);
        tokio::pin!(paint);
        loop {
            tokio::select! {
                biased;
                report = &mut paint => return report.map(Some),
                next = inputs.stream.next(), if !inputs.closed => match next {
                    Some(Ok(Input::Interrupt)) => {
                        tracing::debug!("interrupt during paint");
                        return Ok(None);
                    }
                    Some(input) => inputs.queued.push_back(input),
                    None => inputs.closed = true,
                },
            }
        }
    }

    fn interrupted(&mut self) -> SessionOutcome {
        tracing::info!("interrupted");
        self.controller.handle(Input::Interrupt);
        SessionOutcome::Interrupted
    }

    /// [`Session::run`], abandoned as soon as `interrupt` resolves. Dropping
    /// the in-flight paint kills any renderer child it was waiting on.
    pub async fn run_with_interrupt<I, F>(
        &mut self,
        inputs: I,
        interrupt: F,
    ) -> Result<SessionOutcome>
    where
        I: Stream<Item = io::Result<Input>> + Unpin,
        F: Future<Output = ()>,
    {
        let finished = tokio::select! {
            biased;
            () = interrupt => None,
            result = self.run(inputs) => Some(result),
        };
        match finished {
            Some(result) => result,
            None => Ok(self.interrupted()),
        }
    }
}

/// Input read ahead of the loop while a paint was in flight.
struct InputQueue<I> {
    stream: I,
    queued: VecDeque<io::Result<Input>>,
    closed: bool,
}

impl<I> InputQueue<I>
where
    I: Stream<Item = io::Result<Input>> + Unpin,
{
    fn new(stream: I) -> Self {
        Self {
            stream,
            queued: VecDeque::new(),
            closed: false,
        }
    }

    async fn next(&mut self) -> Option<io::Result<Input>> {
        if let Some(input) = self.queued.pop_front() {
            return Some(input);
        }
        if self.closed {
            return None;
        }
        self.stream.next().await
    }
}
