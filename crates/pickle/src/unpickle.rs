//! A subset of the pickle virtual machine
//!
//! Pickle streams are programs for a small stack machine. Only the opcodes
//! that numpy arrays (and the containers around them) produce under protocols
//! 0 to 5 are implemented. Nothing is ever imported or executed: globals are
//! recorded by name, and calls are recorded as [Value::Object] for the caller
//! to interpret.
//!
//! Byte payloads borrow from the input buffer where the stream holds them
//! verbatim. Payloads that have to be decoded are reference counted, so the
//! copies made by the memo and `DUP` share one allocation.

// standard library
use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;

// crate modules
use crate::error::{Error, Result};
use crate::literal::{self, LiteralError};

// voxtools modules
use voxtools_utils::f;

// external crates
use log::trace;

// nom parser combinators
use nom::bytes::complete::{tag, take, take_until};
use nom::number::complete::{be_f64, le_i32, le_u16, le_u32, le_u64, le_u8};
use nom::sequence::terminated;
use nom::IResult;

/// Opcodes understood by the [Unpickler]
mod op {
    pub const MARK: u8 = b'(';
    pub const STOP: u8 = b'.';
    pub const POP: u8 = b'0';
    pub const POP_MARK: u8 = b'1';
    pub const DUP: u8 = b'2';
    pub const BINFLOAT: u8 = b'G';
    pub const BININT: u8 = b'J';
    pub const BININT1: u8 = b'K';
    pub const BININT2: u8 = b'M';
    pub const NONE: u8 = b'N';
    pub const REDUCE: u8 = b'R';
    pub const BINSTRING: u8 = b'T';
    pub const SHORT_BINSTRING: u8 = b'U';
    pub const BINUNICODE: u8 = b'X';
    pub const APPEND: u8 = b'a';
    pub const BUILD: u8 = b'b';
    pub const GLOBAL: u8 = b'c';
    pub const DICT: u8 = b'd';
    pub const APPENDS: u8 = b'e';
    pub const BINGET: u8 = b'h';
    pub const LONG_BINGET: u8 = b'j';
    pub const LIST: u8 = b'l';
    pub const BINPUT: u8 = b'q';
    pub const LONG_BINPUT: u8 = b'r';
    pub const SETITEM: u8 = b's';
    pub const TUPLE: u8 = b't';
    pub const SETITEMS: u8 = b'u';
    pub const EMPTY_DICT: u8 = b'}';
    pub const EMPTY_LIST: u8 = b']';
    pub const EMPTY_TUPLE: u8 = b')';

    // text literals of protocols 0 and 1
    pub const FLOAT: u8 = b'F';
    pub const INT: u8 = b'I';
    pub const LONG: u8 = b'L';
    pub const STRING: u8 = b'S';
    pub const UNICODE: u8 = b'V';
    pub const GET: u8 = b'g';
    pub const INST: u8 = b'i';
    pub const OBJ: u8 = b'o';
    pub const PUT: u8 = b'p';

    // protocol 2
    pub const PROTO: u8 = 0x80;
    pub const NEWOBJ: u8 = 0x81;
    pub const TUPLE1: u8 = 0x85;
    pub const TUPLE2: u8 = 0x86;
    pub const TUPLE3: u8 = 0x87;
    pub const NEWTRUE: u8 = 0x88;
    pub const NEWFALSE: u8 = 0x89;
    pub const LONG1: u8 = 0x8a;
    pub const LONG4: u8 = 0x8b;

    // protocol 3
    pub const BINBYTES: u8 = b'B';
    pub const SHORT_BINBYTES: u8 = b'C';

    // protocol 4
    pub const SHORT_BINUNICODE: u8 = 0x8c;
    pub const BINUNICODE8: u8 = 0x8d;
    pub const BINBYTES8: u8 = 0x8e;
    pub const NEWOBJ_EX: u8 = 0x92;
    pub const STACK_GLOBAL: u8 = 0x93;
    pub const MEMOIZE: u8 = 0x94;
    pub const FRAME: u8 = 0x95;

    // protocol 5
    pub const BYTEARRAY8: u8 = 0x96;
    pub const NEXT_BUFFER: u8 = 0x97;
    pub const READONLY_BUFFER: u8 = 0x98;
}

/// Highest protocol version understood
pub const HIGHEST_PROTOCOL: u8 = 5;

/// Byte payload of a [Value]
///
/// Either a slice of the pickle stream itself, or bytes decoded from it and
/// shared between every copy of the value.
#[derive(Debug, Clone)]
pub enum Buffer<'a> {
    /// Verbatim bytes of the input
    Borrowed(&'a [u8]),
    /// Decoded bytes
    Shared(Rc<[u8]>),
}

impl Deref for Buffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Buffer::Borrowed(bytes) => bytes,
            Buffer::Shared(bytes) => bytes,
        }
    }
}

impl PartialEq for Buffer<'_> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<'a> From<&'a [u8]> for Buffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Buffer::Borrowed(bytes)
    }
}

impl From<Vec<u8>> for Buffer<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Buffer::Shared(bytes.into())
    }
}

/// A value produced by evaluating a pickle stream
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Python `None`
    None,
    /// Python `bool`
    Bool(bool),
    /// Python `int`, limited to 64 bits
    Int(i64),
    /// Python `float`
    Float(f64),
    /// Python `str`
    Str(Rc<str>),
    /// Python `bytes` or `bytearray`, or a Python 2 `str`
    Bytes(Buffer<'a>),
    /// Python `tuple`
    Tuple(Vec<Value<'a>>),
    /// Python `list`
    List(Vec<Value<'a>>),
    /// Python `dict` as key/value pairs in insertion order
    Dict(Vec<(Value<'a>, Value<'a>)>),
    /// Reference to a module attribute, never resolved
    Global { module: String, name: String },
    /// The result of calling `callable` with `args`, plus any `BUILD` state
    Object {
        callable: Box<Value<'a>>,
        args: Box<Value<'a>>,
        state: Option<Box<Value<'a>>>,
    },
}

impl Value<'_> {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Tuple(items) => f!("tuple of {}", items.len()),
            Value::List(items) => f!("list of {}", items.len()),
            Value::Dict(items) => f!("dict of {}", items.len()),
            Value::Global { module, name } => f!("global {module}.{name}"),
            Value::Object { callable, .. } => f!("object from {}", callable.describe()),
        }
    }

    /// Integer value, with booleans as 0 or 1
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Text value of a `str`, or of `bytes` read as UTF-8
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(&**s)),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b)),
            _ => None,
        }
    }

    /// True for a global with this name in any one of `modules`
    pub fn is_global(&self, modules: &[&str], name: &str) -> bool {
        match self {
            Value::Global {
                module: m,
                name: n,
            } => n == name && modules.contains(&m.as_str()),
            _ => false,
        }
    }
}

/// Deserialise a complete pickle stream
///
/// ```rust
/// # use voxtools_pickle::{unpickle, Value};
/// // pickle.dumps((1, "a"), protocol=2)
/// let bytes = b"\x80\x02K\x01X\x01\x00\x00\x00aq\x00\x86q\x01.";
/// let value = unpickle(bytes).unwrap();
/// assert_eq!(value, Value::Tuple(vec![Value::Int(1), Value::Str("a".into())]));
/// ```
pub fn unpickle(bytes: &[u8]) -> Result<Value<'_>> {
    Unpickler::new(bytes).load()
}

/// Stack machine state while evaluating a stream
#[derive(Debug)]
pub struct Unpickler<'a> {
    /// Remaining input
    input: &'a [u8],
    /// Length of the full input, for offsets
    length: usize,
    /// Byte offset of the opcode being evaluated
    position: usize,
    /// Values since the last mark
    stack: Vec<Value<'a>>,
    /// Stacks saved by each mark
    metastack: Vec<Vec<Value<'a>>>,
    /// Memoised values by key
    memo: HashMap<usize, Value<'a>>,
}

impl<'a> Unpickler<'a> {
    /// Prepare to evaluate `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            length: input.len(),
            position: 0,
            stack: Vec::new(),
            metastack: Vec::new(),
            memo: HashMap::new(),
        }
    }

    /// Run until `STOP`, returning the value on top of the stack
    pub fn load(mut self) -> Result<Value<'a>> {
        loop {
            self.position = self.length - self.input.len();
            let opcode = self.read(le_u8)?;
            trace!("opcode 0x{opcode:02x} at byte {}", self.position);

            match opcode {
                op::STOP => return self.pop(),
                op::PROTO => {
                    let protocol = self.read(le_u8)?;
                    if protocol > HIGHEST_PROTOCOL {
                        return Err(Error::UnsupportedProtocol(protocol));
                    }
                }
                op::FRAME => {
                    // frames only group opcodes for buffered reads
                    self.read(le_u64)?;
                }

                // stack manipulation
                op::MARK => {
                    let stack = std::mem::take(&mut self.stack);
                    self.metastack.push(stack);
                }
                op::POP => {
                    self.pop()?;
                }
                op::POP_MARK => {
                    self.pop_mark()?;
                }
                op::DUP => {
                    let top = self.top()?.clone();
                    self.stack.push(top);
                }

                // constants and numbers
                op::NONE => self.stack.push(Value::None),
                op::NEWTRUE => self.stack.push(Value::Bool(true)),
                op::NEWFALSE => self.stack.push(Value::Bool(false)),
                op::BININT => {
                    let value = self.read(le_i32)?;
                    self.stack.push(Value::Int(value.into()));
                }
                op::BININT1 => {
                    let value = self.read(le_u8)?;
                    self.stack.push(Value::Int(value.into()));
                }
                op::BININT2 => {
                    let value = self.read(le_u16)?;
                    self.stack.push(Value::Int(value.into()));
                }
                op::LONG1 => {
                    let n = self.read(le_u8)? as usize;
                    let value = self.read_long(n)?;
                    self.stack.push(Value::Int(value));
                }
                op::LONG4 => {
                    let n = self.read_length_i32()?;
                    let value = self.read_long(n)?;
                    self.stack.push(Value::Int(value));
                }
                op::BINFLOAT => {
                    let value = self.read(be_f64)?;
                    self.stack.push(Value::Float(value));
                }

                // text
                op::SHORT_BINUNICODE => {
                    let n = self.read(le_u8)? as usize;
                    self.push_text(n)?;
                }
                op::BINUNICODE => {
                    let n = self.read(le_u32)? as usize;
                    self.push_text(n)?;
                }
                op::BINUNICODE8 => {
                    let n = self.read_length_u64()?;
                    self.push_text(n)?;
                }

                // raw bytes, including python 2 strings
                op::SHORT_BINBYTES | op::SHORT_BINSTRING => {
                    let n = self.read(le_u8)? as usize;
                    self.push_bytes(n)?;
                }
                op::BINBYTES => {
                    let n = self.read(le_u32)? as usize;
                    self.push_bytes(n)?;
                }
                op::BINSTRING => {
                    let n = self.read_length_i32()?;
                    self.push_bytes(n)?;
                }
                op::BINBYTES8 | op::BYTEARRAY8 => {
                    let n = self.read_length_u64()?;
                    self.push_bytes(n)?;
                }
                op::NEXT_BUFFER => return Err(Error::OutOfBandBuffer),
                op::READONLY_BUFFER => (),

                // text literals
                op::INT => {
                    let line = self.read_line()?;
                    let value = match line.as_str() {
                        "00" => Value::Bool(false),
                        "01" => Value::Bool(true),
                        text => Value::Int(self.literal(text, literal::decimal(text))?),
                    };
                    self.stack.push(value);
                }
                op::LONG => {
                    let line = self.read_line()?;
                    let value = self.literal(&line, literal::long(&line))?;
                    self.stack.push(Value::Int(value));
                }
                op::FLOAT => {
                    let line = self.read_line()?;
                    let value = self.literal(&line, literal::float(&line))?;
                    self.stack.push(Value::Float(value));
                }
                op::STRING => {
                    let line = self.read_raw_line()?;
                    let text = String::from_utf8_lossy(line);
                    let bytes = self.literal(&text, literal::quoted_string(line))?;
                    self.stack.push(Value::Bytes(bytes.into()));
                }
                op::UNICODE => {
                    let line = self.read_raw_line()?;
                    let text = String::from_utf8_lossy(line);
                    let value = self.literal(&text, literal::raw_unicode_escape(line))?;
                    self.stack.push(Value::Str(value.into()));
                }

                // containers
                op::EMPTY_TUPLE => self.stack.push(Value::Tuple(Vec::new())),
                op::TUPLE => {
                    let items = self.pop_mark()?;
                    self.stack.push(Value::Tuple(items));
                }
                op::TUPLE1 => self.push_tuple(1)?,
                op::TUPLE2 => self.push_tuple(2)?,
                op::TUPLE3 => self.push_tuple(3)?,
                op::EMPTY_LIST => self.stack.push(Value::List(Vec::new())),
                op::LIST => {
                    let items = self.pop_mark()?;
                    self.stack.push(Value::List(items));
                }
                op::APPEND => {
                    let item = self.pop()?;
                    self.list_on_top()?.push(item);
                }
                op::APPENDS => {
                    let items = self.pop_mark()?;
                    self.list_on_top()?.extend(items);
                }
                op::EMPTY_DICT => self.stack.push(Value::Dict(Vec::new())),
                op::DICT => {
                    let items = self.pop_mark()?;
                    let pairs = self.pairs(items)?;
                    self.stack.push(Value::Dict(pairs));
                }
                op::SETITEM => {
                    let value = self.pop()?;
                    let key = self.pop()?;
                    self.dict_on_top()?.push((key, value));
                }
                op::SETITEMS => {
                    let items = self.pop_mark()?;
                    let pairs = self.pairs(items)?;
                    self.dict_on_top()?.extend(pairs);
                }

                // globals and object construction
                op::GLOBAL => {
                    let module = self.read_line()?;
                    let name = self.read_line()?;
                    self.stack.push(Value::Global { module, name });
                }
                op::STACK_GLOBAL => {
                    let name = self.pop_text()?;
                    let module = self.pop_text()?;
                    self.stack.push(Value::Global { module, name });
                }
                op::REDUCE => {
                    let args = self.pop()?;
                    let callable = self.pop()?;
                    let value = self.reduce(callable, args)?;
                    self.stack.push(value);
                }
                op::NEWOBJ => {
                    let args = self.pop()?;
                    let class = self.pop()?;
                    self.stack.push(object(class, args));
                }
                op::INST => {
                    let module = self.read_line()?;
                    let name = self.read_line()?;
                    let args = self.pop_mark()?;
                    let class = Value::Global { module, name };
                    self.stack.push(object(class, Value::Tuple(args)));
                }
                op::OBJ => {
                    let mut args = self.pop_mark()?;
                    if args.is_empty() {
                        return Err(Error::StackUnderflow {
                            offset: self.position,
                        });
                    }
                    let class = args.remove(0);
                    self.stack.push(object(class, Value::Tuple(args)));
                }
                op::NEWOBJ_EX => {
                    let _kwargs = self.pop()?;
                    let args = self.pop()?;
                    let class = self.pop()?;
                    self.stack.push(object(class, args));
                }
                op::BUILD => {
                    let new_state = self.pop()?;
                    let position = self.position;
                    match self.stack.last_mut() {
                        Some(Value::Object { state, .. }) => *state = Some(Box::new(new_state)),
                        Some(other) => {
                            return Err(Error::UnexpectedValue {
                                found: other.describe(),
                                offset: position,
                            })
                        }
                        None => return Err(Error::StackUnderflow { offset: position }),
                    }
                }

                // memo
                op::BINPUT => {
                    let key = self.read(le_u8)? as usize;
                    self.memoize(key)?;
                }
                op::LONG_BINPUT => {
                    let key = self.read(le_u32)? as usize;
                    self.memoize(key)?;
                }
                op::PUT => {
                    let key = self.read_key()?;
                    self.memoize(key)?;
                }
                op::MEMOIZE => {
                    let key = self.memo.len();
                    self.memoize(key)?;
                }
                op::GET => {
                    let key = self.read_key()?;
                    self.recall(key)?;
                }
                op::BINGET => {
                    let key = self.read(le_u8)? as usize;
                    self.recall(key)?;
                }
                op::LONG_BINGET => {
                    let key = self.read(le_u32)? as usize;
                    self.recall(key)?;
                }

                _ => {
                    return Err(Error::UnknownOpcode {
                        opcode,
                        offset: self.position,
                    })
                }
            }
        }
    }
}

/// Input handling
impl<'a> Unpickler<'a> {
    /// Run a nom parser on the remaining input
    fn read<T, P>(&mut self, mut parser: P) -> Result<T>
    where
        P: FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        let offset = self.length - self.input.len();
        let (remaining, value) = parser(self.input).map_err(|_| Error::Truncated { offset })?;
        self.input = remaining;
        Ok(value)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.read(take(n))
    }

    /// Newline terminated argument of the text opcodes
    fn read_raw_line(&mut self) -> Result<&'a [u8]> {
        self.read(terminated(take_until(&b"\n"[..]), tag(&b"\n"[..])))
    }

    fn read_line(&mut self) -> Result<String> {
        let line = self.read_raw_line()?;
        Ok(String::from_utf8(line.to_vec())?)
    }

    /// Decimal memo key of `PUT` and `GET`
    fn read_key(&mut self) -> Result<usize> {
        let line = self.read_line()?;
        let key = self.literal(&line, literal::decimal(&line))?;
        usize::try_from(key).map_err(|_| Error::InvalidLiteral {
            text: line,
            offset: self.position,
        })
    }

    /// Attach the opcode offset to a parsed literal
    fn literal<T>(&self, text: &str, parsed: core::result::Result<T, LiteralError>) -> Result<T> {
        parsed.map_err(|e| match e {
            LiteralError::TooLarge => Error::IntegerTooLarge {
                offset: self.position,
            },
            LiteralError::Invalid => Error::InvalidLiteral {
                text: text.to_string(),
                offset: self.position,
            },
        })
    }

    fn read_length_i32(&mut self) -> Result<usize> {
        let n = self.read(le_i32)?;
        usize::try_from(n).map_err(|_| Error::Truncated {
            offset: self.position,
        })
    }

    fn read_length_u64(&mut self) -> Result<usize> {
        let n = self.read(le_u64)?;
        usize::try_from(n).map_err(|_| Error::Truncated {
            offset: self.position,
        })
    }

    /// Little endian two's complement integer of `n` bytes
    fn read_long(&mut self, n: usize) -> Result<i64> {
        if n > 8 {
            return Err(Error::IntegerTooLarge {
                offset: self.position,
            });
        }

        let bytes = self.read_bytes(n)?;
        let negative = bytes.last().map(|b| b & 0x80 != 0).unwrap_or(false);
        let mut buffer = if negative { [0xff; 8] } else { [0; 8] };
        buffer[..n].copy_from_slice(bytes);
        Ok(i64::from_le_bytes(buffer))
    }

    fn push_text(&mut self, n: usize) -> Result<()> {
        let bytes = self.read_bytes(n)?;
        let text = String::from_utf8(bytes.to_vec())?;
        self.stack.push(Value::Str(text.into()));
        Ok(())
    }

    fn push_bytes(&mut self, n: usize) -> Result<()> {
        let bytes = self.read_bytes(n)?;
        self.stack.push(Value::Bytes(bytes.into()));
        Ok(())
    }
}

/// Stack handling
impl<'a> Unpickler<'a> {
    fn pop(&mut self) -> Result<Value<'a>> {
        self.stack.pop().ok_or(Error::StackUnderflow {
            offset: self.position,
        })
    }

    fn top(&self) -> Result<&Value<'a>> {
        self.stack.last().ok_or(Error::StackUnderflow {
            offset: self.position,
        })
    }

    /// Everything pushed since the last mark, restoring the previous stack
    fn pop_mark(&mut self) -> Result<Vec<Value<'a>>> {
        let previous = self.metastack.pop().ok_or(Error::StackUnderflow {
            offset: self.position,
        })?;
        Ok(std::mem::replace(&mut self.stack, previous))
    }

    fn pop_text(&mut self) -> Result<String> {
        match self.pop()? {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(self.unexpected(&other)),
        }
    }

    fn push_tuple(&mut self, n: usize) -> Result<()> {
        if self.stack.len() < n {
            return Err(Error::StackUnderflow {
                offset: self.position,
            });
        }
        let items = self.stack.split_off(self.stack.len() - n);
        self.stack.push(Value::Tuple(items));
        Ok(())
    }

    fn list_on_top(&mut self) -> Result<&mut Vec<Value<'a>>> {
        let position = self.position;
        match self.stack.last_mut() {
            Some(Value::List(items)) => Ok(items),
            Some(other) => Err(Error::UnexpectedValue {
                found: other.describe(),
                offset: position,
            }),
            None => Err(Error::StackUnderflow { offset: position }),
        }
    }

    fn dict_on_top(&mut self) -> Result<&mut Vec<(Value<'a>, Value<'a>)>> {
        let position = self.position;
        match self.stack.last_mut() {
            Some(Value::Dict(items)) => Ok(items),
            Some(other) => Err(Error::UnexpectedValue {
                found: other.describe(),
                offset: position,
            }),
            None => Err(Error::StackUnderflow { offset: position }),
        }
    }

    /// Alternating keys and values into pairs
    fn pairs(&self, items: Vec<Value<'a>>) -> Result<Vec<(Value<'a>, Value<'a>)>> {
        if items.len() % 2 != 0 {
            return Err(Error::StackUnderflow {
                offset: self.position,
            });
        }

        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut items = items.into_iter();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            pairs.push((key, value));
        }
        Ok(pairs)
    }

    /// Store a copy of the top of the stack, sharing its payloads
    fn memoize(&mut self, key: usize) -> Result<()> {
        let top = self.top()?.clone();
        self.memo.insert(key, top);
        Ok(())
    }

    fn recall(&mut self, key: usize) -> Result<()> {
        let value = self.memo.get(&key).cloned().ok_or(Error::MissingMemo(key))?;
        self.stack.push(value);
        Ok(())
    }

    fn unexpected(&self, value: &Value) -> Error {
        Error::UnexpectedValue {
            found: value.describe(),
            offset: self.position,
        }
    }
}

/// Calls that must be evaluated to recover plain data
impl<'a> Unpickler<'a> {
    /// Apply `callable` to `args`
    ///
    /// Protocol 2 has no bytes opcodes, so python 3 writes byte strings as
    /// `_codecs.encode(text, "latin1")`. These are decoded back into bytes.
    /// Every other call is kept as an [Value::Object].
    fn reduce(&self, callable: Value<'a>, args: Value<'a>) -> Result<Value<'a>> {
        if callable.is_global(&["_codecs"], "encode") {
            if let Value::Tuple(items) = &args {
                if let [Value::Str(text), Value::Str(encoding)] = items.as_slice() {
                    if matches!(&**encoding, "latin1" | "latin-1" | "iso-8859-1") {
                        return self.latin1(text);
                    }
                }
            }
        }

        if callable.is_global(&["builtins", "__builtin__"], "bytes")
            || callable.is_global(&["builtins", "__builtin__"], "bytearray")
        {
            if let Value::Tuple(items) = &args {
                match items.as_slice() {
                    [] => return Ok(Value::Bytes(Vec::new().into())),
                    [Value::Bytes(bytes)] => return Ok(Value::Bytes(bytes.clone())),
                    _ => (),
                }
            }
        }

        Ok(object(callable, args))
    }

    fn latin1(&self, text: &str) -> Result<Value<'a>> {
        let bytes = text
            .chars()
            .map(|c| u8::try_from(c as u32))
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|_| Error::UnexpectedValue {
                found: "non latin-1 text".to_string(),
                offset: self.position,
            })?;
        Ok(Value::Bytes(bytes.into()))
    }
}

fn object<'a>(callable: Value<'a>, args: Value<'a>) -> Value<'a> {
    Value::Object {
        callable: Box::new(callable),
        args: Box::new(args),
        state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream() {
        assert!(matches!(unpickle(b""), Err(Error::Truncated { offset: 0 })));
    }

    #[test]
    fn missing_stop() {
        assert!(matches!(
            unpickle(b"\x80\x04K\x01"),
            Err(Error::Truncated { offset: 4 })
        ));
    }

    #[test]
    fn newer_protocol() {
        assert!(matches!(
            unpickle(b"\x80\x06N."),
            Err(Error::UnsupportedProtocol(6))
        ));
    }

    #[test]
    fn integers() {
        assert_eq!(unpickle(b"K\xff.").unwrap(), Value::Int(255));
        assert_eq!(unpickle(b"M\x00\x01.").unwrap(), Value::Int(256));
        assert_eq!(unpickle(b"J\xfe\xff\xff\xff.").unwrap(), Value::Int(-2));
        // LONG1 with sign extension
        assert_eq!(unpickle(b"\x8a\x01\xff.").unwrap(), Value::Int(-1));
        assert_eq!(unpickle(b"\x8a\x02\x00\x80.").unwrap(), Value::Int(-32768));
        assert_eq!(unpickle(b"\x8a\x00.").unwrap(), Value::Int(0));
        assert!(matches!(
            unpickle(b"\x8a\x09\x00\x00\x00\x00\x00\x00\x00\x00\x01."),
            Err(Error::IntegerTooLarge { .. })
        ));
    }

    #[test]
    fn float() {
        let mut bytes = vec![op::BINFLOAT];
        bytes.extend(2.5f64.to_be_bytes());
        bytes.push(op::STOP);
        assert_eq!(unpickle(&bytes).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn marks_and_containers() {
        // (1, [2, 3], {"a": None})
        let bytes = b"(K\x01]q\x00(K\x02K\x03e}\x8c\x01aNst.";
        assert_eq!(
            unpickle(bytes).unwrap(),
            Value::Tuple(vec![
                Value::Int(1),
                Value::List(vec![Value::Int(2), Value::Int(3)]),
                Value::Dict(vec![(Value::Str("a".into()), Value::None)]),
            ])
        );
    }

    #[test]
    fn memo_round_trip() {
        let bytes = b"\x8c\x01x\x94h\x00\x86.";
        assert_eq!(
            unpickle(bytes).unwrap(),
            Value::Tuple(vec![Value::Str("x".into()), Value::Str("x".into())])
        );
        assert!(matches!(unpickle(b"h\x07."), Err(Error::MissingMemo(7))));
    }

    #[test]
    fn globals_are_not_resolved() {
        let value = unpickle(b"cos\nsystem\n.").unwrap();
        assert!(value.is_global(&["os"], "system"));

        let value = unpickle(b"\x8c\x05numpy\x8c\x05dtype\x93.").unwrap();
        assert!(value.is_global(&["numpy"], "dtype"));
    }

    #[test]
    fn reduce_and_build() {
        // numpy.dtype("f8", False, True) with a byte order state
        let bytes = b"\x8c\x05numpy\x8c\x05dtype\x93\x8c\x02f8\x89\x88\x87R(K\x03\x8c\x01<tb.";
        match unpickle(bytes).unwrap() {
            Value::Object {
                callable,
                args,
                state,
            } => {
                assert!(callable.is_global(&["numpy"], "dtype"));
                assert_eq!(
                    *args,
                    Value::Tuple(vec![
                        Value::Str("f8".into()),
                        Value::Bool(false),
                        Value::Bool(true)
                    ])
                );
                assert_eq!(
                    state.map(|s| *s),
                    Some(Value::Tuple(vec![Value::Int(3), Value::Str("<".into())]))
                );
            }
            other => panic!("expected an object, found {other:?}"),
        }
    }

    #[test]
    fn latin1_bytes_from_protocol_2() {
        let bytes = b"c_codecs\nencode\nX\x03\x00\x00\x00\xc3\xbfaX\x06\x00\x00\x00latin1\x86R.";
        assert_eq!(
            unpickle(bytes).unwrap(),
            Value::Bytes(vec![0xff, b'a'].into())
        );
    }

    #[test]
    fn bytes_borrow_from_input() {
        let bytes = b"C\x03abc.";
        match unpickle(bytes).unwrap() {
            Value::Bytes(Buffer::Borrowed(b)) => assert_eq!(b, b"abc"),
            other => panic!("expected borrowed bytes, found {other:?}"),
        }
    }

    #[test]
    fn build_needs_an_object() {
        assert!(matches!(
            unpickle(b"K\x01Nb."),
            Err(Error::UnexpectedValue { offset: 3, .. })
        ));
    }

    #[test]
    fn out_of_band_buffers() {
        assert!(matches!(
            unpickle(b"\x80\x05\x97."),
            Err(Error::OutOfBandBuffer)
        ));
    }

    #[test]
    fn unknown_opcode() {
        assert!(matches!(
            unpickle(b"\x80\x02\xff."),
            Err(Error::UnknownOpcode {
                opcode: 0xff,
                offset: 2
            })
        ));
    }

    #[test]
    fn text_literals() {
        assert_eq!(unpickle(b"I42\n.").unwrap(), Value::Int(42));
        assert_eq!(unpickle(b"I-7\n.").unwrap(), Value::Int(-7));
        assert_eq!(unpickle(b"I01\n.").unwrap(), Value::Bool(true));
        assert_eq!(unpickle(b"I00\n.").unwrap(), Value::Bool(false));
        assert_eq!(unpickle(b"L12345L\n.").unwrap(), Value::Int(12345));
        assert_eq!(unpickle(b"F-0.25\n.").unwrap(), Value::Float(-0.25));
        assert_eq!(
            unpickle(b"S'<f8'\n.").unwrap(),
            Value::Bytes(b"<f8".to_vec().into())
        );
        assert_eq!(
            unpickle(b"Vlatin1\\u00e9\n.").unwrap(),
            Value::Str("latin1\u{e9}".into())
        );
    }

    #[test]
    fn invalid_text_literals() {
        assert!(matches!(
            unpickle(b"K\x01I1x\n."),
            Err(Error::InvalidLiteral { offset: 2, .. })
        ));
        assert!(matches!(
            unpickle(b"L99999999999999999999L\n."),
            Err(Error::IntegerTooLarge { offset: 0 })
        ));
        assert!(matches!(
            unpickle(b"Sabc\n."),
            Err(Error::InvalidLiteral { offset: 0, .. })
        ));
        assert!(matches!(unpickle(b"I4"), Err(Error::Truncated { offset: 1 })));
    }

    #[test]
    fn text_memo() {
        // pickle.dumps(("x", "x"), protocol=0)
        let bytes = b"(Vx\np0\ng0\ntp1\n.";
        assert_eq!(
            unpickle(bytes).unwrap(),
            Value::Tuple(vec![Value::Str("x".into()), Value::Str("x".into())])
        );
        assert!(matches!(unpickle(b"g3\n."), Err(Error::MissingMemo(3))));
        assert!(matches!(
            unpickle(b"Np-1\n."),
            Err(Error::InvalidLiteral { offset: 1, .. })
        ));
    }

    #[test]
    fn memo_copies_share_payloads() {
        let bytes = b"c_codecs\nencode\nX\x01\x00\x00\x00aX\x06\x00\x00\x00latin1\x86Rq\x00h\x00\x86.";
        match unpickle(bytes).unwrap() {
            Value::Tuple(items) => match items.as_slice() {
                [Value::Bytes(Buffer::Shared(a)), Value::Bytes(Buffer::Shared(b))] => {
                    assert!(Rc::ptr_eq(a, b));
                }
                other => panic!("expected two shared buffers, found {other:?}"),
            },
            other => panic!("expected a tuple, found {other:?}"),
        }
    }

    #[test]
    fn old_style_instances() {
        // INST and OBJ both record the call
        let value = unpickle(b"(I1\nicollections\nOrderedDict\n.").unwrap();
        match value {
            Value::Object { callable, args, .. } => {
                assert!(callable.is_global(&["collections"], "OrderedDict"));
                assert_eq!(*args, Value::Tuple(vec![Value::Int(1)]));
            }
            other => panic!("expected an object, found {other:?}"),
        }

        let value = unpickle(b"(cnumpy\ndtype\nS'f8'\no.").unwrap();
        match value {
            Value::Object { callable, args, .. } => {
                assert!(callable.is_global(&["numpy"], "dtype"));
                assert_eq!(*args, Value::Tuple(vec![Value::Bytes(b"f8".to_vec().into())]));
            }
            other => panic!("expected an object, found {other:?}"),
        }

        assert!(matches!(unpickle(b"(o."), Err(Error::StackUnderflow { .. })));
    }
}
