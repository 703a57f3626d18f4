//! Builders for the archives served to the bootstrap in tests.
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use zip::write::SimpleFileOptions;

pub enum Entry {
    Dir(&'static str),
    File(&'static str, Vec<u8>, u32),
}

impl Entry {
    pub fn file(name: &'static str, content: impl AsRef<[u8]>, mode: u32) -> Self {
        Entry::File(name, content.as_ref().to_vec(), mode)
    }
}

pub fn tar_gz(entries: &[Entry]) -> Vec<u8> {
    let mut tar = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for entry in entries {
        let mut header = tar::Header::new_gnu();
        match entry {
            Entry::Dir(name) => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                tar.append_data(&mut header, name, std::io::empty())
                    .unwrap();
            }
            Entry::File(name, content, mode) => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(*mode);
                header.set_size(content.len() as u64);
                tar.append_data(&mut header, name, content.as_slice())
                    .unwrap();
            }
        }
    }
    tar.into_inner().unwrap().finish().unwrap()
}

pub fn zip(entries: &[Entry]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for entry in entries {
        match entry {
            Entry::Dir(name) => {
                zip.add_directory(*name, SimpleFileOptions::default().unix_permissions(0o755))
                    .unwrap();
            }
            Entry::File(name, content, mode) => {
                let options = SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated)
                    .unix_permissions(*mode);
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
    }
    zip.finish().unwrap().into_inner()
}

/// A runtime archive wrapped in a single top-level directory, as vendors ship them.
pub fn runtime_tar_gz(java_script: &str) -> Vec<u8> {
    tar_gz(&[
        Entry::Dir("pkg/"),
        Entry::Dir("pkg/bin/"),
        Entry::file("pkg/bin/java", java_script, 0o755),
        Entry::file("pkg/lib/data", "runtime data", 0o644),
    ])
}

pub fn sdk_zip() -> Vec<u8> {
    zip(&[
        Entry::Dir("javafx-sdk-21/"),
        Entry::Dir("javafx-sdk-21/lib/"),
        Entry::file("javafx-sdk-21/lib/javafx.base.jar", "base", 0o644),
        Entry::file("javafx-sdk-21/legal/LICENSE", "license", 0o644),
    ])
}
