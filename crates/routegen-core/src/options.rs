//! Generator configuration.
//!
//! [`GeneratorOptions`] names everything the emitted code refers to: the marker
//! contract, the two external capabilities (route builder and service collection),
//! the generated class and methods, and the artifact hint names. The defaults
//! target ASP.NET Core minimal APIs.
//!
//! ```
//! use routegen_core::GeneratorOptions;
//!
//! let options = GeneratorOptions::new()
//!     .with_contract_namespace("Acme.Web")
//!     .with_registration_class("AcmeEndpoints");
//! assert_eq!(options.marker_contract().to_string(), "Acme.Web.IEndpoint");
//! assert!(options.validate().is_ok());
//! ```

use crate::{ConfigError, QualifiedName};

/// Default namespace for the generated contract and registration class.
pub const DEFAULT_CONTRACT_NAMESPACE: &str = "Routegen";
/// Default marker contract name.
pub const DEFAULT_CONTRACT_NAME: &str = "IEndpoint";
/// Default name of the contract's single operation.
pub const DEFAULT_CONTRACT_METHOD: &str = "MapEndpoint";
/// Default route-builder capability type.
pub const DEFAULT_ROUTE_BUILDER_TYPE: &str = "Microsoft.AspNetCore.Routing.IEndpointRouteBuilder";
/// Default service-registry capability type.
pub const DEFAULT_SERVICE_COLLECTION_TYPE: &str =
    "Microsoft.Extensions.DependencyInjection.IServiceCollection";
/// Namespace imported so `AddScoped<T>()` resolves.
pub const DEFAULT_DI_NAMESPACE: &str = "Microsoft.Extensions.DependencyInjection";
/// Default registration class name.
pub const DEFAULT_REGISTRATION_CLASS: &str = "EndpointRegistration";
/// Default DI-registration method name.
pub const DEFAULT_ADD_METHOD: &str = "AddEndpoints";
/// Default route-mapping method name.
pub const DEFAULT_MAP_METHOD: &str = "MapEndpoints";
/// Default hint name of the contract artifact.
pub const DEFAULT_CONTRACT_HINT: &str = "IEndpoint.g.cs";
/// Default hint name of the registration artifact.
pub const DEFAULT_REGISTRATION_HINT: &str = "EndpointRegistration.g.cs";

/// Options controlling discovery and emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    contract_namespace: String,
    contract_name: String,
    contract_method: String,
    route_builder_type: String,
    service_collection_type: String,
    di_namespace: String,
    registration_class: String,
    add_method: String,
    map_method: String,
    contract_hint: String,
    registration_hint: String,
}

impl GeneratorOptions {
    /// Options with every default.
    pub fn new() -> Self {
        Self {
            contract_namespace: DEFAULT_CONTRACT_NAMESPACE.to_string(),
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            contract_method: DEFAULT_CONTRACT_METHOD.to_string(),
            route_builder_type: DEFAULT_ROUTE_BUILDER_TYPE.to_string(),
            service_collection_type: DEFAULT_SERVICE_COLLECTION_TYPE.to_string(),
            di_namespace: DEFAULT_DI_NAMESPACE.to_string(),
            registration_class: DEFAULT_REGISTRATION_CLASS.to_string(),
            add_method: DEFAULT_ADD_METHOD.to_string(),
            map_method: DEFAULT_MAP_METHOD.to_string(),
            contract_hint: DEFAULT_CONTRACT_HINT.to_string(),
            registration_hint: DEFAULT_REGISTRATION_HINT.to_string(),
        }
    }

    pub fn with_contract_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.contract_namespace = namespace.into();
        self
    }

    pub fn with_contract_name(mut self, name: impl Into<String>) -> Self {
        self.contract_name = name.into();
        self
    }

    pub fn with_contract_method(mut self, name: impl Into<String>) -> Self {
        self.contract_method = name.into();
        self
    }

    pub fn with_route_builder_type(mut self, ty: impl Into<String>) -> Self {
        self.route_builder_type = ty.into();
        self
    }

    pub fn with_service_collection_type(mut self, ty: impl Into<String>) -> Self {
        self.service_collection_type = ty.into();
        self
    }

    pub fn with_di_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.di_namespace = namespace.into();
        self
    }

    pub fn with_registration_class(mut self, name: impl Into<String>) -> Self {
        self.registration_class = name.into();
        self
    }

    pub fn with_add_method(mut self, name: impl Into<String>) -> Self {
        self.add_method = name.into();
        self
    }

    pub fn with_map_method(mut self, name: impl Into<String>) -> Self {
        self.map_method = name.into();
        self
    }

    pub fn with_contract_hint(mut self, hint: impl Into<String>) -> Self {
        self.contract_hint = hint.into();
        self
    }

    pub fn with_registration_hint(mut self, hint: impl Into<String>) -> Self {
        self.registration_hint = hint.into();
        self
    }

    pub fn contract_namespace(&self) -> &str {
        &self.contract_namespace
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn contract_method(&self) -> &str {
        &self.contract_method
    }

    pub fn route_builder_type(&self) -> &str {
        &self.route_builder_type
    }

    pub fn service_collection_type(&self) -> &str {
        &self.service_collection_type
    }

    pub fn di_namespace(&self) -> &str {
        &self.di_namespace
    }

    pub fn registration_class(&self) -> &str {
        &self.registration_class
    }

    pub fn add_method(&self) -> &str {
        &self.add_method
    }

    pub fn map_method(&self) -> &str {
        &self.map_method
    }

    pub fn contract_hint(&self) -> &str {
        &self.contract_hint
    }

    pub fn registration_hint(&self) -> &str {
        &self.registration_hint
    }

    /// Qualified name of the marker contract, matched exactly during resolution.
    pub fn marker_contract(&self) -> QualifiedName {
        QualifiedName::parse(&self.contract_namespace).child(self.contract_name.as_str())
    }

    /// Check that every option can be emitted as valid source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_identifier("contract_name", &self.contract_name)?;
        check_identifier("contract_method", &self.contract_method)?;
        check_identifier("registration_class", &self.registration_class)?;
        check_identifier("add_method", &self.add_method)?;
        check_identifier("map_method", &self.map_method)?;
        check_dotted("contract_namespace", &self.contract_namespace)?;
        check_dotted("route_builder_type", &self.route_builder_type)?;
        check_dotted("service_collection_type", &self.service_collection_type)?;
        check_dotted("di_namespace", &self.di_namespace)?;

        if self.add_method == self.map_method {
            return Err(ConfigError::DuplicateMethodName(self.add_method.clone()));
        }
        if self.contract_hint == self.registration_hint {
            return Err(ConfigError::DuplicateHintName(self.contract_hint.clone()));
        }
        Ok(())
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `value` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifier(option: &'static str, value: &str) -> Result<(), ConfigError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            option,
            value: value.to_string(),
        })
    }
}

fn check_dotted(option: &'static str, value: &str) -> Result<(), ConfigError> {
    if !value.is_empty() && value.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(ConfigError::InvalidQualifiedName {
            option,
            value: value.to_string(),
        })
    }
}
