//! Build the byte streams numpy produces for `pickle.dumps` and `numpy.save`
#![allow(dead_code)]

/// Pickle writer covering the opcodes numpy arrays are written with
pub struct Pickler {
    protocol: u8,
    body: Vec<u8>,
    memo: u32,
}

impl Pickler {
    pub fn new(protocol: u8) -> Self {
        Self {
            protocol,
            body: Vec::new(),
            memo: 0,
        }
    }

    pub fn op(&mut self, opcode: u8) -> &mut Self {
        self.body.push(opcode);
        self
    }

    /// Store the top of the stack the way each protocol does
    pub fn put(&mut self) -> &mut Self {
        if self.protocol == 0 {
            let key = self.memo.to_string();
            self.line(b'p', &key);
        } else if self.protocol >= 4 {
            self.body.push(0x94);
        } else if self.memo < 256 {
            self.body.extend([b'q', self.memo as u8]);
        } else {
            self.body.push(b'r');
            self.body.extend(self.memo.to_le_bytes());
        }
        self.memo += 1;
        self
    }

    /// Opcode with a newline terminated text argument
    pub fn line(&mut self, opcode: u8, text: &str) -> &mut Self {
        self.body.push(opcode);
        self.body.extend(text.as_bytes());
        self.body.push(b'\n');
        self
    }

    pub fn int(&mut self, value: i64) -> &mut Self {
        if self.protocol == 0 {
            return self.line(b'I', &value.to_string());
        }
        match value {
            0..=255 => self.body.extend([b'K', value as u8]),
            256..=65535 => {
                self.body.push(b'M');
                self.body.extend((value as u16).to_le_bytes());
            }
            _ => {
                self.body.push(b'J');
                self.body.extend((value as i32).to_le_bytes());
            }
        }
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        if self.protocol < 2 {
            return self.line(b'I', if value { "01" } else { "00" });
        }
        self.op(if value { 0x88 } else { 0x89 })
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        if self.protocol == 0 {
            self.body.push(b'V');
            self.body.extend(raw_unicode_escape(value));
            self.body.push(b'\n');
            return self.put();
        }

        let bytes = value.as_bytes();
        if self.protocol >= 4 && bytes.len() < 256 {
            self.body.extend([0x8c, bytes.len() as u8]);
        } else {
            self.body.push(b'X');
            self.body.extend((bytes.len() as u32).to_le_bytes());
        }
        self.body.extend(bytes);
        self.put()
    }

    /// Start a tuple, which needs a mark before protocol 2
    pub fn begin_tuple(&mut self) -> &mut Self {
        if self.protocol < 2 {
            self.op(b'(');
        }
        self
    }

    /// Tuple of the last `n` values, `n` between 1 and 3
    pub fn end_tuple(&mut self, n: u8) -> &mut Self {
        match self.protocol < 2 {
            true => self.op(b't'),
            false => self.op(0x84 + n),
        }
    }

    /// Python 3 bytes, as `_codecs.encode(text, "latin1")` before protocol 3
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        if self.protocol < 3 {
            let text: String = value.iter().map(|&b| b as char).collect();
            return self
                .global("_codecs", "encode")
                .begin_tuple()
                .str(&text)
                .str("latin1")
                .end_tuple(2)
                .put()
                .op(b'R')
                .put();
        }

        if value.len() < 256 {
            self.body.extend([b'C', value.len() as u8]);
        } else if value.len() <= u32::MAX as usize {
            self.body.push(b'B');
            self.body.extend((value.len() as u32).to_le_bytes());
        } else {
            self.body.push(0x8e);
            self.body.extend((value.len() as u64).to_le_bytes());
        }
        self.body.extend(value);
        self.put()
    }

    /// An in-band `PickleBuffer` over a writeable array
    pub fn bytearray(&mut self, value: &[u8]) -> &mut Self {
        self.body.push(0x96);
        self.body.extend((value.len() as u64).to_le_bytes());
        self.body.extend(value);
        self.put()
    }

    pub fn global(&mut self, module: &str, name: &str) -> &mut Self {
        if self.protocol >= 4 {
            self.str(module).str(name).op(0x93);
        } else {
            self.body.push(b'c');
            self.body.extend(module.as_bytes());
            self.body.push(b'\n');
            self.body.extend(name.as_bytes());
            self.body.push(b'\n');
        }
        self.put()
    }

    pub fn shape(&mut self, shape: &[usize]) -> &mut Self {
        self.op(b'(');
        for &extent in shape {
            self.int(extent as i64);
        }
        self.op(b't').put()
    }

    /// `numpy.dtype` with its byte order state, from a type string like `<f8`
    pub fn dtype(&mut self, descr: &str) -> &mut Self {
        let (order, code) = descr.split_at(1);
        self.global("numpy", "dtype")
            .begin_tuple()
            .str(code)
            .bool(false)
            .bool(true)
            .end_tuple(3)
            .put()
            .op(b'R')
            .put()
            .op(b'(')
            .int(3)
            .str(order)
            .op(b'N')
            .op(b'N')
            .op(b'N')
            .int(-1)
            .int(-1)
            .int(0)
            .op(b't')
            .put()
            .op(b'b')
    }

    /// The complete stream, with protocol header and framing
    pub fn finish(&mut self) -> Vec<u8> {
        self.body.push(b'.');

        let mut stream = match self.protocol {
            0 | 1 => Vec::new(),
            _ => vec![0x80, self.protocol],
        };
        if self.protocol >= 4 {
            stream.push(0x95);
            stream.extend((self.body.len() as u64).to_le_bytes());
        }
        stream.extend(&self.body);
        stream
    }
}

/// `pickle.dumps(array, protocol)` for a numeric array
pub fn pickle_array(protocol: u8, descr: &str, shape: &[usize], fortran: bool, data: &[u8]) -> Vec<u8> {
    let mut p = Pickler::new(protocol);

    if protocol >= 5 {
        p.global("numpy._core.numeric", "_frombuffer")
            .op(b'(')
            .bytearray(data)
            .dtype(descr)
            .shape(shape)
            .str(if fortran { "F" } else { "C" })
            .op(b't')
            .put()
            .op(b'R')
            .put();
        return p.finish();
    }

    p.global("numpy.core.multiarray", "_reconstruct")
        .begin_tuple()
        .global("numpy", "ndarray")
        .begin_tuple()
        .int(0)
        .end_tuple(1)
        .put()
        .bytes(b"b")
        .end_tuple(3)
        .put()
        .op(b'R')
        .put()
        .op(b'(')
        .int(1)
        .shape(shape)
        .dtype(descr)
        .bool(fortran)
        .bytes(data)
        .op(b't')
        .put()
        .op(b'b');
    p.finish()
}

/// Text of a protocol 0 `UNICODE` opcode
fn raw_unicode_escape(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len());
    for c in value.chars() {
        match c as u32 {
            0x00 | 0x0a | 0x0d | 0x1a | 0x5c | 0x100..=0xffff => {
                bytes.extend(format!("\\u{:04x}", c as u32).as_bytes())
            }
            0x10000.. => bytes.extend(format!("\\U{:08x}", c as u32).as_bytes()),
            latin1 => bytes.push(latin1 as u8),
        }
    }
    bytes
}

/// `numpy.save` output, format version 1.0
pub fn npy_array(descr: &str, shape: &[usize], fortran: bool, data: &[u8]) -> Vec<u8> {
    let shape = match shape {
        [n] => format!("({n},)"),
        _ => format!(
            "({})",
            shape.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
        ),
    };
    let fortran = if fortran { "True" } else { "False" };
    let mut header =
        format!("{{'descr': '{descr}', 'fortran_order': {fortran}, 'shape': {shape}, }}");

    // pad so the data starts on a 64 byte boundary
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
    bytes.extend((header.len() as u16).to_le_bytes());
    bytes.extend(header.as_bytes());
    bytes.extend(data);
    bytes
}

/// Serialise a slice of values with one of the `to_xx_bytes` methods
pub fn raw_bytes<T: Copy, const N: usize>(values: &[T], to_bytes: fn(T) -> [u8; N]) -> Vec<u8> {
    values.iter().flat_map(|&v| to_bytes(v)).collect()
}
