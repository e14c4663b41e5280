use shared::{RoleFlags, UserAccount, Veterinarian};

#[derive(Debug, Clone)]
pub struct ListUsersResult {
    pub users: Vec<UserAccount>,
}

#[derive(Debug, Clone)]
pub struct SetRolesCommand {
    pub uid: String,
    pub flags: RoleFlags,
}

#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub uid: String,
}

#[derive(Debug, Clone)]
pub struct DeleteUserResult {
    pub deleted_uid: String,
}

#[derive(Debug, Clone)]
pub struct ListVeterinariansResult {
    pub veterinarians: Vec<Veterinarian>,
}
