//! Write the files `pickle.dump(array, f, protocol=4)` would produce
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Protocol 4 pickle of a numeric numpy array with a `<` or `|` type string
pub fn pickle_array(descr: &str, shape: &[usize], data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();

    let text = |body: &mut Vec<u8>, s: &str| {
        body.extend([0x8c, s.len() as u8]);
        body.extend(s.as_bytes());
        body.push(0x94);
    };
    let global = |body: &mut Vec<u8>, module: &str, name: &str| {
        text(body, module);
        text(body, name);
        body.extend([0x93, 0x94]);
    };

    // _reconstruct(ndarray, (0,), b'b')
    global(&mut body, "numpy.core.multiarray", "_reconstruct");
    global(&mut body, "numpy", "ndarray");
    body.extend(b"K\x00\x85\x94C\x01b\x94\x87\x94R\x94");

    // (1, shape, dtype, False, data)
    body.extend(b"(K\x01(");
    for &extent in shape {
        body.push(b'J');
        body.extend((extent as i32).to_le_bytes());
    }
    body.extend(b"t\x94");

    let (order, code) = descr.split_at(1);
    global(&mut body, "numpy", "dtype");
    text(&mut body, code);
    body.extend(b"\x89\x88\x87\x94R\x94(K\x03");
    text(&mut body, order);
    body.extend(b"NNNJ\xff\xff\xff\xffJ\xff\xff\xff\xffK\x00t\x94b\x89");

    body.push(0x8e);
    body.extend((data.len() as u64).to_le_bytes());
    body.extend(data);
    body.extend(b"\x94t\x94b.");

    let mut stream = vec![0x80, 4, 0x95];
    stream.extend((body.len() as u64).to_le_bytes());
    stream.extend(body);
    stream
}

/// Write a pickled array into `dir`, returning the path
pub fn write_pickle(dir: &Path, name: &str, descr: &str, shape: &[usize], data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pickle_array(descr, shape, data)).unwrap();
    path
}

/// Serialise a slice of values with one of the `to_xx_bytes` methods
pub fn raw_bytes<T: Copy, const N: usize>(values: &[T], to_bytes: fn(T) -> [u8; N]) -> Vec<u8> {
    values.iter().flat_map(|&v| to_bytes(v)).collect()
}
