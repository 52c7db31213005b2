/// Package whose decorators the synthesized metadata refers to
pub const OPENAPI_PACKAGE_NAME: &str = "@nestjs/swagger";

/// Alias used for synthesized references when the file never imports the package
pub const IMPLICIT_NAMESPACE: &str = "pre_openapi";

/// Name of the generated static accessor
pub const METADATA_FACTORY_NAME: &str = "_OPENAPI_METADATA_FACTORY";

pub const API_PROPERTY: &str = "ApiProperty";
pub const API_PROPERTY_OPTIONAL: &str = "ApiPropertyOptional";
pub const API_HIDE_PROPERTY: &str = "ApiHideProperty";
pub const API_OPERATION: &str = "ApiOperation";

pub const DESCRIPTION_KEY: &str = "description";
pub const EXAMPLE_KEY: &str = "example";
pub const EXAMPLES_KEY: &str = "examples";
