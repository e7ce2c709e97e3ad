#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub contact_number: String,
    pub email: String,
}

/// Field values accepted on create and full update.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub contact_number: String,
    pub email: String,
}
