//SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Debug;

/**
A destination for formatted log text.

Devices are shared between the [`Sink`](crate::Sink) that owns them and any thread emitting
through it, so every method takes `&self` and implementations serialize their own writes.
*/
pub trait Device: Debug + Send + Sync {
    /**
    Writes one formatted record.

    The text already carries its line breaks.  It must reach the destination in a single
    piece, not interleaved with text from a concurrent call.
    */
    fn write_text(&self, text: &str);

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn flush(&self);

    /**
    Releases the destination.  Writes after this are dropped.
    */
    fn close(&self);
}

/*
Boilerplate notes.

# Device

Clone would mean two owners of one file handle; devices are shared through Arc instead.
PartialEq/Eq/Hash: data equality or provenance?  Unclear, so no.
Default is not sensible since a file device needs a path.
Send/Sync are required, since records arrive from any thread.
*/
