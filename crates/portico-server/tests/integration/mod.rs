mod guard_redirects;
mod login_flow;
mod scoped_records;
