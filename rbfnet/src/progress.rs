/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines diagnostic messages, sinks, and helper functions for network training.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Diagnostic reporting primitives for network training.

use std::fmt::Debug;
use std::sync::{mpsc, Arc};
use std::thread;

/// Diagnostic events emitted while training a network.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMsg {
    /// Event indicating that assembly of the training system has begun.
    TrainingStarted {
        num_samples: usize,
        num_variables: usize,
    },

    /// Singular value summary of the system that was solved.
    Conditioning {
        sval_max: f64,
        sval_min: f64,
        rcond: f64,
    },

    /// Relative residual `||A w - b|| / ||b||` of the solved weights.
    Residual { relative_error: f64 },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The channel holds at most `buffer` pending messages. Emitting never blocks
/// training: while the buffer is full, new messages are dropped, so a slow
/// handler can miss diagnostics.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Progress sink that writes every message to the `log` facade at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, msg: ProgressMsg) {
        match msg {
            ProgressMsg::TrainingStarted {
                num_samples,
                num_variables,
            } => log::info!("training on {num_samples} samples of {num_variables} variables"),
            ProgressMsg::Conditioning {
                sval_max,
                sval_min,
                rcond,
            } => log::info!("svalmax = {sval_max:e}, svalmin = {sval_min:e}, rcond = {rcond:e}"),
            ProgressMsg::Residual { relative_error } => {
                log::info!("relative residual = {relative_error:e}")
            }
            ProgressMsg::Message { message } => log::info!("{message}"),
        }
    }
}

/// Emits `msg` to `sink` when one is installed.
#[inline]
pub(crate) fn emit(sink: &Option<Arc<dyn ProgressSink>>, msg: impl FnOnce() -> ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg());
    }
}
