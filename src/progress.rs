/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines training event messages, warning sinks, and helper functions for reporting.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Reporting primitives for training events and misuse warnings.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

/// Events emitted by an approximator during its lifecycle.
#[derive(Debug, Clone)]
pub enum ProgressMsg {
    /// A misuse warning (e.g. training twice, predicting before training).
    /// The operation that produced it was skipped.
    Warning { message: String },

    /// Event indicating a training call completed and installed a model.
    Trained {
        num_samples: usize,
        num_basis_functions: usize,
    },

    /// Event indicating grid data artifacts were written to disk.
    GridDataSaved {
        directory: PathBuf,
        num_grid_points: usize,
    },

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
/// The listener thread ends once every clone of the returned sink has been
/// dropped and the channel drains.
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
