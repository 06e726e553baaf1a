pub mod article_routes;
pub mod system_routes;

#[cfg(test)]
mod tests;
