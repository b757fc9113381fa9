//! Line-based wire protocol (§6): one token per line, both directions.
//!
//! Requests travel solution → driver, responses driver → solution. Both
//! are plain ASCII integers and identifiers, one per line, so the codec
//! is a thin `BufRead`/`Write` wrapper rather than a binary framing layer.

use std::io::{BufRead, Write};

use ta_diagnostic::InterfaceError;

/// Recursively encoded call/callback argument or return data (§6 "data
/// encoding"): a scalar is one int; an array is its length followed by
/// that many recursively encoded items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireValue {
    Scalar(i64),
    Array(Vec<WireValue>),
}

/// One raised callback's name and declared parameter count, sent as part
/// of a `MethodCall` request so the driver knows what the solution may
/// invoke during this call.
#[derive(Clone, Debug)]
pub struct CallbackSignature {
    pub name: String,
    pub param_count: usize,
}

/// A request read from the solution.
#[derive(Clone, Debug)]
pub enum Request {
    MethodCall {
        name: String,
        args: Vec<WireValue>,
        has_return_value: bool,
        callbacks: Vec<CallbackSignature>,
    },
    CallbackReturn {
        value: Option<i64>,
    },
    Exit,
}

/// Reads one token (one line, trimmed) at a time from the underlying
/// reader.
pub struct Decoder<R> {
    reader: R,
    /// A request already parsed by `peek_request` but not yet consumed by
    /// `read_request`, so looking ahead never discards the bytes it read.
    peeked: Option<Request>,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder { reader, peeked: None }
    }

    fn read_line(&mut self) -> Result<String, InterfaceError> {
        let mut line = String::new();
        let bytes = self
            .reader
            .read_line(&mut line)
            .map_err(|err| InterfaceError::Io(err.to_string()))?;
        if bytes == 0 {
            return Err(InterfaceError::MalformedMessage("unexpected end of input".to_string()));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn read_int(&mut self) -> Result<i64, InterfaceError> {
        let line = self.read_line()?;
        line.parse()
            .map_err(|_| InterfaceError::MalformedMessage(format!("expected an integer, got `{line}`")))
    }

    /// Reads one bare integer line with no meta-type tag, as used for
    /// `input`/`output`/`checkpoint` steps and callback dispatch, which
    /// sit outside the `Request`/`Response` framing (see `engine.rs`'s
    /// module doc).
    pub fn read_raw_scalar(&mut self) -> Result<i64, InterfaceError> {
        self.read_int()
    }

    fn read_usize(&mut self) -> Result<usize, InterfaceError> {
        let line = self.read_line()?;
        line.parse()
            .map_err(|_| InterfaceError::MalformedMessage(format!("expected a non-negative integer, got `{line}`")))
    }

    /// Reads one recursively-encoded value (§6 "data encoding"): a meta-type
    /// tag (`0` scalar, `1` array), then the payload.
    pub fn read_value(&mut self) -> Result<WireValue, InterfaceError> {
        match self.read_int()? {
            0 => Ok(WireValue::Scalar(self.read_int()?)),
            1 => {
                let len = self.read_usize()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value()?);
                }
                Ok(WireValue::Array(items))
            }
            other => Err(InterfaceError::MalformedMessage(format!("unknown meta-type tag `{other}`"))),
        }
    }

    /// Reads one request, dispatching on its discriminator line, returning
    /// a previously peeked one first if there is one.
    pub fn read_request(&mut self) -> Result<Request, InterfaceError> {
        if let Some(request) = self.peeked.take() {
            return Ok(request);
        }
        self.read_request_inner()
    }

    /// Reads one request without consuming it: the next `read_request`
    /// call returns the same value rather than reading past it.
    pub fn peek_request(&mut self) -> Result<Request, InterfaceError> {
        if let Some(request) = &self.peeked {
            return Ok(request.clone());
        }
        let request = self.read_request_inner()?;
        self.peeked = Some(request.clone());
        Ok(request)
    }

    fn read_request_inner(&mut self) -> Result<Request, InterfaceError> {
        match self.read_line()?.as_str() {
            "method_call" => {
                let name = self.read_line()?;
                let arg_count = self.read_usize()?;
                let mut args = Vec::with_capacity(arg_count);
                for _ in 0..arg_count {
                    args.push(self.read_value()?);
                }
                let has_return_value = self.read_int()? != 0;
                let callback_count = self.read_usize()?;
                let mut callbacks = Vec::with_capacity(callback_count);
                for _ in 0..callback_count {
                    let name = self.read_line()?;
                    let param_count = self.read_usize()?;
                    callbacks.push(CallbackSignature { name, param_count });
                }
                Ok(Request::MethodCall { name, args, has_return_value, callbacks })
            }
            "callback_return" => {
                let has_return_value = self.read_int()? != 0;
                let value = if has_return_value { Some(self.read_int()?) } else { None };
                Ok(Request::CallbackReturn { value })
            }
            "exit" => Ok(Request::Exit),
            other => Err(InterfaceError::UnexpectedRequest {
                expected: vec!["method_call".to_string(), "callback_return".to_string(), "exit".to_string()],
                got: other.to_string(),
            }),
        }
    }
}

/// Writes one token (one line) at a time to the underlying writer,
/// flushing after every response so the solution is never left blocked
/// on a buffered pipe.
pub struct Encoder<W> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder { writer }
    }

    fn write_line(&mut self, line: &str) -> Result<(), InterfaceError> {
        writeln!(self.writer, "{line}").map_err(|err| InterfaceError::Io(err.to_string()))
    }

    pub fn write_scalar(&mut self, value: i64) -> Result<(), InterfaceError> {
        self.write_line(&value.to_string())
    }

    pub fn write_value(&mut self, value: &WireValue) -> Result<(), InterfaceError> {
        match value {
            WireValue::Scalar(v) => {
                self.write_line("0")?;
                self.write_line(&v.to_string())
            }
            WireValue::Array(items) => {
                self.write_line("1")?;
                self.write_line(&items.len().to_string())?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
        }
    }

    /// Sends a raised callback: its index, then its scalar parameters in
    /// declaration order (§6 "CallbackCall").
    pub fn write_callback_call(&mut self, index: usize, params: &[i64]) -> Result<(), InterfaceError> {
        self.write_line(&index.to_string())?;
        for &param in params {
            self.write_scalar(param)?;
        }
        self.flush()
    }

    /// Sends a method's optional return value (§6 "Method return").
    pub fn write_method_return(&mut self, value: Option<i64>) -> Result<(), InterfaceError> {
        match value {
            Some(v) => {
                self.write_line("1")?;
                self.write_scalar(v)
            }
            None => self.write_line("0"),
        }?;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), InterfaceError> {
        self.writer.flush().map_err(|err| InterfaceError::Io(err.to_string()))
    }

    /// Writes one `Request` in the same line layout `Decoder::read_request`
    /// parses. The engine uses this both to initiate a `Call` (`MethodCall`)
    /// and to reply to a raised callback (`CallbackReturn`) — see
    /// `engine.rs`'s module doc for why both directions share this type.
    pub fn write_request(&mut self, request: &Request) -> Result<(), InterfaceError> {
        match request {
            Request::MethodCall { name, args, has_return_value, callbacks } => {
                self.write_line("method_call")?;
                self.write_line(name)?;
                self.write_line(&args.len().to_string())?;
                for arg in args {
                    self.write_value(arg)?;
                }
                self.write_line(if *has_return_value { "1" } else { "0" })?;
                self.write_line(&callbacks.len().to_string())?;
                for callback in callbacks {
                    self.write_line(&callback.name)?;
                    self.write_line(&callback.param_count.to_string())?;
                }
                Ok(())
            }
            Request::CallbackReturn { value } => {
                self.write_line("callback_return")?;
                match value {
                    Some(v) => {
                        self.write_line("1")?;
                        self.write_scalar(*v)
                    }
                    None => self.write_line("0"),
                }
            }
            Request::Exit => self.write_line("exit"),
        }
    }

    pub fn write_exit(&mut self) -> Result<(), InterfaceError> {
        self.write_request(&Request::Exit)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_nested_array_value() {
        let value = WireValue::Array(vec![
            WireValue::Scalar(1),
            WireValue::Array(vec![WireValue::Scalar(2), WireValue::Scalar(3)]),
        ]);
        let mut buf = Vec::new();
        Encoder::new(&mut buf).write_value(&value).expect("encode should succeed");

        let decoded = Decoder::new(buf.as_slice()).read_value().expect("decode should succeed");
        assert_eq!(decoded, value);
    }

    #[test]
    fn decodes_a_method_call_request() {
        let input = "method_call\nsolve\n1\n0\n42\n1\n1\nnotify\n2\n";
        let request = Decoder::new(input.as_bytes()).read_request().expect("should decode");
        match request {
            Request::MethodCall { name, args, has_return_value, callbacks } => {
                assert_eq!(name, "solve");
                assert_eq!(args, vec![WireValue::Scalar(42)]);
                assert!(has_return_value);
                assert_eq!(callbacks.len(), 1);
                assert_eq!(callbacks[0].name, "notify");
                assert_eq!(callbacks[0].param_count, 2);
            }
            other => panic!("expected a method_call request, got {other:?}"),
        }
    }

    #[test]
    fn peeking_a_request_does_not_consume_it() {
        let input = "exit\n";
        let mut decoder = Decoder::new(input.as_bytes());
        assert!(matches!(decoder.peek_request().expect("peek should succeed"), Request::Exit));
        assert!(matches!(decoder.peek_request().expect("second peek should succeed"), Request::Exit));
        assert!(matches!(decoder.read_request().expect("read should return the peeked request"), Request::Exit));
    }
}
