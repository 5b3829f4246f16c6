pub mod workday;

/// Short random identifier for derived relations.
pub fn shortid() -> String {
    nanoid::nanoid!(10)
}
