use crate::error::Result;
use crate::object::ObjectKind;
use crate::repository::Repository;
use crate::resolve;

pub fn run(name: &str, wyag_type: Option<ObjectKind>) -> Result<()> {
    let repo = Repository::find(".")?;
    let oid = resolve::find(&repo, name, wyag_type, true)?;
    println!("{oid}");
    Ok(())
}
