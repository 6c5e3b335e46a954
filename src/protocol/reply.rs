//! Reply lines.
//!
//! Wire grammar (one line each, `\n` terminated):
//! ```text
//! READY
//! ACK:SETF:f1,f2,f3,f4,big
//! ACK:SETL:c1,c2,c3,c4
//! ACK:SETALL:f1,f2,f3,f4,big;c1,c2,c3,c4
//! DATA:STATE:F:f1,f2,f3,f4,big;L:c1,c2,c3,c4
//! ERR:<BAD_ARGS|OUT_OF_RANGE|BAD_COLOR|UNKNOWN_CMD>
//! ```

use core::fmt::{self, Write as _};

use crate::app::state::{DeviceState, FanBank, LedBank, LedList};
use crate::error::ProtocolError;

use super::transport::{Transport, write_all};

/// Longest reply line including the terminator.
pub const MAX_REPLY_LEN: usize = 64;

/// One outbound protocol line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Boot banner.
    Ready,
    SetFans(FanBank),
    SetLeds(LedBank),
    SetAll(FanBank, LedBank),
    State(DeviceState),
    Error(ProtocolError),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("READY"),
            Self::SetFans(fans) => write!(f, "ACK:SETF:{fans}"),
            Self::SetLeds(leds) => write!(f, "ACK:SETL:{}", LedList(leds)),
            Self::SetAll(fans, leds) => write!(f, "ACK:SETALL:{fans};{}", LedList(leds)),
            Self::State(s) => write!(f, "DATA:STATE:F:{};L:{}", s.fans, LedList(&s.leds)),
            Self::Error(e) => write!(f, "{e}"),
        }
    }
}

impl Reply {
    /// Render the full line, terminator included, without allocating.
    pub fn encode(&self) -> heapless::String<MAX_REPLY_LEN> {
        let mut line = heapless::String::new();
        // Every variant fits: the longest, a full DATA:STATE line, is 51 bytes.
        let fits = writeln!(line, "{self}").is_ok();
        debug_assert!(fits, "reply {self:?} exceeds {MAX_REPLY_LEN} bytes");
        line
    }

    /// Write the line to `transport` and flush.
    pub fn send<T: Transport>(&self, transport: &mut T) -> Result<(), T::Error> {
        write_all(transport, self.encode().as_bytes())
    }
}
