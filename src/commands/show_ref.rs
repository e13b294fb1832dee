use crate::error::Result;
use crate::refs;
use crate::repository::Repository;

pub fn run() -> Result<()> {
    let repo = Repository::find(".")?;

    for (name, oid) in refs::list_flat(&repo)? {
        println!("{oid} {name}");
    }

    Ok(())
}
