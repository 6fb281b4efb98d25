//! Prints the CRD manifests of all managed resources as a multi-document YAML stream.

use crds::{CloudsqlInstance, Network, Provider};
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    let crds = [Provider::crd(), CloudsqlInstance::crd(), Network::crd()];
    for crd in &crds {
        println!("---");
        print!("{}", serde_yaml::to_string(crd)?);
    }
    Ok(())
}
