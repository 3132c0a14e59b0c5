//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# guardlog

guardlog is a thread-safe, reconfigurable logging facility for Rust.

# The problem

A long-running program usually wants two kinds of log output over its life.  While a person is
watching, the console should show the message and little else.  Once it runs unattended, a file
should get every scrap of context: which process, which thread, when to the millisecond, at what
severity.  Switching between the two has to be safe while every other thread keeps logging.

Doing that switch field by field is where things go wrong.  A thread that logs halfway through a
reconfiguration can end up writing the new file's worth of context to the old console, or the
other way around.

# The facility

A [`Facility`] keeps its destination and its display flags behind a single lock and swaps them
together.  Two presets cover the common cases:

| Operation                          | Destination            | Preset  | Shows                                                   |
|------------------------------------|------------------------|---------|---------------------------------------------------------|
| [`Facility::configure_stream`]     | stderr, stdout, writer | minimal | program name (if set) and the message                   |
| [`Facility::configure_file`]       | rotating file          | full    | program name, pid, thread, line counter, time, severity |

Individual flags can be changed afterwards through their accessors, such as
[`Facility::set_show_level`].

```rust
use guardlog::{Facility, Severity, Stream};

let facility = Facility::new();
facility.configure_stream(Some("svc"), Stream::Stderr);
facility.set_show_level(true);
facility.info("ready");          // svc: INFO: ready
facility.set_threshold(Severity::Warn);
facility.info("not shown");
```

# Output format

Each record becomes one line per line of its message, and each line carries the enabled context:

```text
svc(4242:3)[1/2]: 20240309T070502.026: ERROR: connection reset (IoError)
svc(4242:3)[2/2]: 20240309T070502.026: ERROR: caused by: broken pipe
```

See the [`format_record`] docs for the exact rules.

# The default facility

Most programs only need one.  [`facility()`] returns a process-wide instance, created on first
use, and every facility method has a free-function twin:

```rust
guardlog::set_show_level(true);
guardlog::warn("low disk");
guardlog::info!("{} files rotated", 2);
```

The initial threshold of the default facility comes from the `GUARDLOG_LEVEL` environment
variable (`debug`, `info`, `warn`, `error` or `fatal`), if set.

# Guarded fields

The locking behind the facility is available on its own.  [`Guard`] wraps a type's state in a
lock, and [`guarded_field!`] / [`deep_guarded_field!`] generate accessor pairs that take it.  See
the [`guard`] module.
*/

pub mod guard;
mod severity;
mod payload;
mod sys;
mod format;
mod error;
mod device;
mod stream_device;
mod inmemory_device;
mod rotating_file_device;
mod sink;
mod facility;
mod global_facility;
mod macros;

pub use guard::Guard;
pub use guardlog_proc::{deep_guarded_field, guarded_field};
pub use severity::{ParseSeverityError, Severity};
pub use payload::{ErrorReport, Payload};
pub use format::{DisplayFlags, Formatter, custom_formatter, fixed_formatter, format_record};
pub use error::SinkError;
pub use device::Device;
pub use stream_device::{Stream, StreamDevice};
pub use inmemory_device::InMemoryDevice;
pub use rotating_file_device::{FileOptions, RotatingFileDevice};
pub use sink::Sink;
pub use facility::{Facility, LEVEL_ENV};
pub use global_facility::*;
