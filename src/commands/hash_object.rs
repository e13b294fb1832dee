use std::path::PathBuf;

use crate::error::Result;
use crate::object::{store, Object, ObjectKind};
use crate::repository::Repository;

pub fn run(write: bool, object_type: ObjectKind, file: PathBuf) -> Result<()> {
    let data = std::fs::read(&file)?;
    let obj = Object::deserialize(object_type, &data)?;

    let repo = if write { Some(Repository::find(".")?) } else { None };
    let oid = store::write(repo.as_ref(), &obj)?;
    println!("{oid}");

    Ok(())
}
