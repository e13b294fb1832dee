use std::io::Write;

use crate::error::Result;
use crate::object::{store, ObjectKind};
use crate::repository::Repository;
use crate::resolve;

pub fn run(object_type: ObjectKind, object: &str) -> Result<()> {
    let repo = Repository::find(".")?;

    let oid = resolve::find(&repo, object, Some(object_type), true)?;
    let obj = store::read(&repo, &oid)?;

    std::io::stdout().write_all(&obj.serialize())?;
    Ok(())
}
