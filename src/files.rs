//! Reading `.anim` files from disk.

use errors::{Result, ResultExt};
use exporter::Exporter;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use util::cur::Cur;

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut f = File::open(path)
        .chain_err(|| format!("couldn't open {}", path.display()))?;
    let mut b: Vec<u8> = vec![];
    f.read_to_end(&mut b)?;
    Ok(b)
}

/// Reads and decodes the animation at `path` with the default rig.
pub fn load_animation(path: &Path) -> Result<Exporter> {
    let mut exporter = Exporter::new();
    decode_file(path, &mut exporter)?;
    Ok(exporter)
}

/// Reads the animation at `path` and decodes it into `exporter`, which may
/// have had its skeleton adjusted first.
pub fn decode_file(path: &Path, exporter: &mut Exporter) -> Result<()> {
    let bytes = read_file(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    exporter.deserialize(Cur::new(&bytes[..]))
        .chain_err(|| format!("couldn't decode {}", path.display()))?;
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let path = Path::new("/nonexistent/animbvh/missing.anim");
    assert!(read_file(path).is_err());
    assert!(load_animation(path).is_err());
}
