/*!
Request extractors.
*/

pub mod jwt;
