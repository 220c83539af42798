#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Reviewer = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Reviewer),
            _ => None,
        }
    }

    /// Admin and HR may write reviewed attendance back.
    pub fn can_commit(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
