use diesel::prelude::*;

use crate::domain::user::User;
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader};

impl UserReader for DieselRepository {
    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let items = users::table
            .order(users::email.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(items)
    }

    fn count_users(&self) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let total = users::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}
