use async_trait::async_trait;
use uuid::Uuid;

use super::loyalty::FrequentFlyer;
use super::model::{
    Customer, CustomerAccount, CustomerRow, Employee, EmployeeAccount, EmployeeRole, Role, User,
};
use crate::error::AppResult;
use crate::store::PgStore;

/// Users, customers and employees.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>>;
    /// Customer-role users that have no customer profile yet.
    async fn unprofiled_customer_users(&self) -> AppResult<Vec<User>>;
    async fn insert_user(&self, user: &User) -> AppResult<()>;
    async fn update_user(&self, id: Uuid, email: &str, role: Role) -> AppResult<Option<User>>;
    /// Removes the account together with its customer/employee profile.
    async fn delete_user(&self, id: Uuid) -> AppResult<bool>;

    async fn find_customer(&self, id: Uuid) -> AppResult<Option<Customer>>;
    async fn find_customer_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>>;
    async fn list_customers(&self) -> AppResult<Vec<CustomerAccount>>;
    async fn insert_customer(&self, customer: &Customer) -> AppResult<()>;
    /// Overwrites every profile field, ledger included.
    async fn save_customer(&self, customer: &Customer) -> AppResult<()>;
    async fn save_frequent_flyer(&self, customer_id: Uuid, ledger: &FrequentFlyer) -> AppResult<()>;
    async fn delete_customer(&self, id: Uuid) -> AppResult<bool>;

    async fn find_employee(&self, id: Uuid) -> AppResult<Option<Employee>>;
    async fn find_employee_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>>;
    async fn list_employees(&self) -> AppResult<Vec<EmployeeAccount>>;
    async fn insert_employee(&self, employee: &Employee) -> AppResult<()>;
    async fn update_employee_role(
        &self,
        id: Uuid,
        role: EmployeeRole,
    ) -> AppResult<Option<Employee>>;
    async fn delete_employee(&self, id: Uuid) -> AppResult<bool>;
}

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";
const CUSTOMER_COLUMNS: &str = "id, user_id, passport, phone, address, ff_status, ff_points, \
     seat_preference, meal_preference, created_at";

#[derive(sqlx::FromRow)]
struct CustomerAccountRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    email: String,
}

#[derive(sqlx::FromRow)]
struct EmployeeAccountRow {
    #[sqlx(flatten)]
    employee: Employee,
    email: String,
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn unprofiled_customer_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.role, u.created_at
              FROM users u
             WHERE u.role = 'customer'
               AND NOT EXISTS (SELECT 1 FROM customers c WHERE c.user_id = u.id)
             ORDER BY u.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_user(&self, id: Uuid, email: &str, role: Role) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = $2, role = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        // customers/employees reference users with ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    async fn find_customer_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    async fn list_customers(&self) -> AppResult<Vec<CustomerAccount>> {
        let rows = sqlx::query_as::<_, CustomerAccountRow>(
            r#"
            SELECT c.id, c.user_id, c.passport, c.phone, c.address, c.ff_status, c.ff_points,
                   c.seat_preference, c.meal_preference, c.created_at, u.email
              FROM customers c
              JOIN users u ON u.id = c.user_id
             ORDER BY c.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| CustomerAccount {
                customer: r.customer.into(),
                email: r.email,
            })
            .collect())
    }

    async fn insert_customer(&self, c: &Customer) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, user_id, passport, phone, address, ff_status, ff_points,
                                   seat_preference, meal_preference, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(c.id)
        .bind(c.user_id)
        .bind(&c.passport)
        .bind(&c.contact_info.phone)
        .bind(&c.contact_info.address)
        .bind(c.frequent_flyer.status)
        .bind(c.frequent_flyer.points)
        .bind(&c.preferences.seat_preference)
        .bind(&c.preferences.meal_preference)
        .bind(c.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_customer(&self, c: &Customer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE customers
               SET passport = $2, phone = $3, address = $4, ff_status = $5, ff_points = $6,
                   seat_preference = $7, meal_preference = $8
             WHERE id = $1
            "#,
        )
        .bind(c.id)
        .bind(&c.passport)
        .bind(&c.contact_info.phone)
        .bind(&c.contact_info.address)
        .bind(c.frequent_flyer.status)
        .bind(c.frequent_flyer.points)
        .bind(&c.preferences.seat_preference)
        .bind(&c.preferences.meal_preference)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_frequent_flyer(
        &self,
        customer_id: Uuid,
        ledger: &FrequentFlyer,
    ) -> AppResult<()> {
        sqlx::query("UPDATE customers SET ff_status = $2, ff_points = $3 WHERE id = $1")
            .bind(customer_id)
            .bind(ledger.status)
            .bind(ledger.points)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_employee(&self, id: Uuid) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, user_id, role, created_at FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn find_employee_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, user_id, role, created_at FROM employees WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn list_employees(&self) -> AppResult<Vec<EmployeeAccount>> {
        let rows = sqlx::query_as::<_, EmployeeAccountRow>(
            r#"
            SELECT e.id, e.user_id, e.role, e.created_at, u.email
              FROM employees e
              JOIN users u ON u.id = e.user_id
             ORDER BY e.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| EmployeeAccount {
                employee: r.employee,
                email: r.email,
            })
            .collect())
    }

    async fn insert_employee(&self, e: &Employee) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO employees (id, user_id, role, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(e.id)
        .bind(e.user_id)
        .bind(e.role)
        .bind(e.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_employee_role(
        &self,
        id: Uuid,
        role: EmployeeRole,
    ) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE employees SET role = $2 WHERE id = $1 RETURNING id, user_id, role, created_at",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
