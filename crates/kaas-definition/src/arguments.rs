//! Per-invocation arguments of a cluster creation

/// Everything the user passed on the command line, plus the stored token.
///
/// Fields that take part in override precedence are `Option`s. A flag given
/// as `0` or as an empty string counts as not given.
#[derive(Clone, Debug, PartialEq)]
pub struct Arguments {
    /// Token from the stored configuration
    pub auth_token: Option<String>,
    /// Token passed explicitly for this invocation
    pub user_provided_token: Option<String>,
    pub cluster_name: Option<String>,
    pub owner: Option<String>,
    pub release_version: Option<String>,
    pub availability_zones: Option<i64>,
    pub num_workers: Option<i64>,
    pub workers_min: Option<i64>,
    pub workers_max: Option<i64>,
    pub worker_num_cpus: Option<i64>,
    pub worker_memory_size_gb: Option<f64>,
    pub worker_storage_size_gb: Option<f64>,
    pub worker_aws_ec2_instance_type: Option<String>,
    pub worker_azure_vm_size: Option<String>,
    /// Unset, or an explicit request for or against HA masters
    pub master_ha: Option<bool>,
    pub create_default_node_pool: bool,
    /// Path of the definition file; `-` reads standard input
    pub input_yaml_file: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            auth_token: None,
            user_provided_token: None,
            cluster_name: None,
            owner: None,
            release_version: None,
            availability_zones: None,
            num_workers: None,
            workers_min: None,
            workers_max: None,
            worker_num_cpus: None,
            worker_memory_size_gb: None,
            worker_storage_size_gb: None,
            worker_aws_ec2_instance_type: None,
            worker_azure_vm_size: None,
            master_ha: None,
            create_default_node_pool: true,
            input_yaml_file: None,
            dry_run: false,
            verbose: false,
        }
    }
}

impl Arguments {
    /// The token to authenticate with, preferring the explicit one
    pub fn token(&self) -> Option<&str> {
        given_str(&self.user_provided_token).or_else(|| given_str(&self.auth_token))
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn input_file(&self) -> Option<&str> {
        given_str(&self.input_yaml_file)
    }

    pub fn cluster_name(&self) -> Option<&str> {
        given_str(&self.cluster_name)
    }

    pub fn owner(&self) -> Option<&str> {
        given_str(&self.owner)
    }

    pub fn release_version(&self) -> Option<&str> {
        given_str(&self.release_version)
    }

    pub fn availability_zones(&self) -> Option<i64> {
        given_int(self.availability_zones)
    }

    pub fn num_workers(&self) -> Option<i64> {
        given_int(self.num_workers)
    }

    pub fn workers_min(&self) -> Option<i64> {
        given_int(self.workers_min)
    }

    pub fn workers_max(&self) -> Option<i64> {
        given_int(self.workers_max)
    }

    pub fn worker_num_cpus(&self) -> Option<i64> {
        given_int(self.worker_num_cpus)
    }

    pub fn worker_memory_size_gb(&self) -> Option<f64> {
        given_float(self.worker_memory_size_gb)
    }

    pub fn worker_storage_size_gb(&self) -> Option<f64> {
        given_float(self.worker_storage_size_gb)
    }

    pub fn worker_aws_ec2_instance_type(&self) -> Option<&str> {
        given_str(&self.worker_aws_ec2_instance_type)
    }

    pub fn worker_azure_vm_size(&self) -> Option<&str> {
        given_str(&self.worker_azure_vm_size)
    }

    /// True if any flag sizing the CPU, memory or storage of workers is given
    pub fn has_resource_flags(&self) -> bool {
        self.worker_num_cpus().is_some()
            || self.worker_memory_size_gb().is_some()
            || self.worker_storage_size_gb().is_some()
    }

    /// True if any flag naming a provider machine type is given
    pub fn has_machine_type_flags(&self) -> bool {
        self.worker_aws_ec2_instance_type().is_some() || self.worker_azure_vm_size().is_some()
    }

    /// True if any flag shaping a v4 worker group is given
    pub fn has_worker_flags(&self) -> bool {
        self.has_resource_flags() || self.has_machine_type_flags()
    }
}

fn given_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn given_int(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

fn given_float(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
